//! Core domain types for the liftlog session engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Routines and their exercises (read-only input)
//! - Planned sets and their recorded outcomes
//! - Session phases and summaries
//! - Persisted session records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Routine Types
// ============================================================================

/// An exercise within a routine, with target sets/reps/weight
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoutineExercise {
    pub name: String,
    /// Values <= 0 produce no sets
    pub planned_sets: i32,
    pub planned_reps: u32,
    #[serde(default)]
    pub planned_weight: Option<f64>,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A workout routine template (e.g., "Push Day")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<RoutineExercise>,
}

// ============================================================================
// Planned Set Types
// ============================================================================

/// Completion status of a planned set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

/// A value that is either not yet recorded or recorded by the user.
///
/// Keeps "logged 0 reps" distinct from "never attempted".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Actual<T> {
    #[default]
    NotRecorded,
    Recorded(T),
}

impl<T> Actual<T> {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Actual::Recorded(_))
    }

    /// Get the recorded value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Actual::Recorded(v) => Some(v),
            Actual::NotRecorded => None,
        }
    }
}

impl<T: Copy> Actual<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T> From<Option<T>> for Actual<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Actual::Recorded(v),
            None => Actual::NotRecorded,
        }
    }
}

/// One row of the flat execution plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedSet {
    /// Index into the routine's exercise list
    pub exercise_index: usize,
    /// Snapshot of the exercise name, kept after the routine is released
    pub exercise_name: String,
    /// 1-based set number within the exercise
    pub set_number: u32,
    pub target_reps: u32,
    pub target_weight: Option<f64>,
    pub status: SetStatus,
    pub actual_reps: Actual<u32>,
    pub actual_weight: Actual<f64>,
}

impl PlannedSet {
    pub fn is_pending(&self) -> bool {
        self.status == SetStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == SetStatus::Completed
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Lifecycle phase of a workout session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
    Paused,
}

impl SessionPhase {
    pub fn is_active(self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// Completion report produced when a session ends
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SessionSummary {
    pub duration_seconds: u64,
    /// Completed sets in plan order
    pub completed_sets: Vec<PlannedSet>,
    pub routine_name: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Per-exercise aggregate over completed sets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseTotals {
    pub exercise_name: String,
    pub sets: u32,
    pub reps: u64,
    pub volume: f64,
}

// ============================================================================
// Persisted Records
// ============================================================================

/// A single completed set as stored by the summary log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedSetRecord {
    pub exercise_name: String,
    pub set_number: u32,
    pub reps_completed: u32,
    pub weight_used: Option<f64>,
}

/// Snapshot of a finished session, independent of the routine it came from
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub routine_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: u64,
    pub sets: Vec<CompletedSetRecord>,
}

impl From<&PlannedSet> for CompletedSetRecord {
    fn from(set: &PlannedSet) -> Self {
        CompletedSetRecord {
            exercise_name: set.exercise_name.clone(),
            set_number: set.set_number,
            reps_completed: set.actual_reps.get().unwrap_or(set.target_reps),
            weight_used: set.actual_weight.get(),
        }
    }
}

impl SessionRecord {
    /// Build a record with a fresh id from a session summary
    pub fn from_summary(summary: &SessionSummary) -> Self {
        SessionRecord {
            id: Uuid::new_v4(),
            routine_name: summary
                .routine_name
                .clone()
                .unwrap_or_else(|| "Unnamed routine".into()),
            started_at: summary.started_at,
            ended_at: summary.ended_at,
            duration_seconds: summary.duration_seconds,
            sets: summary
                .completed_sets
                .iter()
                .map(CompletedSetRecord::from)
                .collect(),
        }
    }
}
