//! Active workout session state machine.
//!
//! A [`WorkoutSession`] moves through `Idle -> Running <-> Paused -> Idle`.
//! Starting a session generates the flat set plan; ending it produces a
//! [`SessionSummary`] and resets everything back to the idle state in one
//! step.
//!
//! The cursor is advisory. Sets may be completed or skipped in any order,
//! and only completion moves the cursor (forward, to the next pending set
//! after the completed one).

use crate::{
    plan, summary, Actual, Error, PlannedSet, Result, Routine, SessionPhase, SessionSummary,
    SetStatus,
};
use chrono::{DateTime, Utc};

/// The live session owned by a single controller
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutSession {
    pub(crate) phase: SessionPhase,
    routine: Option<Routine>,
    started_at: Option<DateTime<Utc>>,
    pub(crate) elapsed_seconds: u64,
    sets: Vec<PlannedSet>,
    cursor: usize,
}

impl WorkoutSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Start a session for `routine`, abandoning any session in progress
    pub fn start(&mut self, routine: Routine) {
        self.start_at(routine, Utc::now())
    }

    /// Start a session with an explicit start timestamp
    pub fn start_at(&mut self, routine: Routine, now: DateTime<Utc>) {
        if self.phase.is_active() {
            tracing::warn!(
                "Starting '{}' abandons active session ({} sets, {}s elapsed)",
                routine.name,
                self.sets.len(),
                self.elapsed_seconds
            );
        }

        let sets = plan::generate(&routine);
        tracing::info!(
            "Started session '{}' with {} planned sets",
            routine.name,
            sets.len()
        );

        *self = WorkoutSession {
            phase: SessionPhase::Running,
            routine: Some(routine),
            started_at: Some(now),
            elapsed_seconds: 0,
            sets,
            cursor: 0,
        };
    }

    /// Pause a running session. Returns whether the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            tracing::debug!("Ignoring pause while {}", self.phase);
            return false;
        }
        self.phase = SessionPhase::Paused;
        tracing::info!("Session paused at {}s", self.elapsed_seconds);
        true
    }

    /// Resume a paused session. Returns whether the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            tracing::debug!("Ignoring resume while {}", self.phase);
            return false;
        }
        self.phase = SessionPhase::Running;
        tracing::info!("Session resumed at {}s", self.elapsed_seconds);
        true
    }

    /// End the active session, returning its summary and resetting to idle
    pub fn end(&mut self) -> Result<SessionSummary> {
        self.end_at(Utc::now())
    }

    /// End the active session with an explicit end timestamp
    pub fn end_at(&mut self, now: DateTime<Utc>) -> Result<SessionSummary> {
        self.require_active("end session")?;

        let finished = std::mem::take(self);
        let mut report = summary::summarize(finished.elapsed_seconds, &finished.sets);
        report.routine_name = finished.routine.map(|r| r.name);
        report.started_at = finished.started_at;
        report.ended_at = Some(now);

        tracing::info!(
            "Session ended after {}s with {}/{} sets completed",
            report.duration_seconds,
            report.completed_sets.len(),
            finished.sets.len()
        );

        Ok(report)
    }

    // ------------------------------------------------------------------------
    // Set management
    // ------------------------------------------------------------------------

    /// Mark a set completed, defaulting actual values to the targets
    pub fn complete_set(
        &mut self,
        index: usize,
        reps: Option<u32>,
        weight: Option<f64>,
    ) -> Result<()> {
        self.require_active("complete set")?;
        let set = self.set_mut(index)?;

        set.status = SetStatus::Completed;
        set.actual_reps = Actual::Recorded(reps.unwrap_or(set.target_reps));
        set.actual_weight = weight.or(set.target_weight).into();

        tracing::debug!(
            "Completed set {} ({} #{}): {:?} reps @ {:?}",
            index,
            set.exercise_name,
            set.set_number,
            set.actual_reps,
            set.actual_weight
        );

        if let Some(next) = self.next_pending_after(index) {
            self.cursor = next;
        }
        Ok(())
    }

    /// Mark a set skipped. The cursor does not move.
    pub fn skip_set(&mut self, index: usize) -> Result<()> {
        self.require_active("skip set")?;
        let set = self.set_mut(index)?;
        set.status = SetStatus::Skipped;
        tracing::debug!("Skipped set {} ({} #{})", index, set.exercise_name, set.set_number);
        Ok(())
    }

    /// Overwrite the recorded values of a set without touching its status
    pub fn edit_set(&mut self, index: usize, reps: u32, weight: Option<f64>) -> Result<()> {
        self.require_active("edit set")?;
        let set = self.set_mut(index)?;
        set.actual_reps = Actual::Recorded(reps);
        set.actual_weight = weight.into();
        tracing::debug!("Edited set {}: {} reps @ {:?}", index, reps, weight);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn is_paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    pub fn routine(&self) -> Option<&Routine> {
        self.routine.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn sets(&self) -> &[PlannedSet] {
        &self.sets
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The set at the cursor, if the plan is non-empty
    pub fn current_set(&self) -> Option<&PlannedSet> {
        self.sets.get(self.cursor)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn require_active(&self, operation: &'static str) -> Result<()> {
        if !self.phase.is_active() {
            return Err(Error::InvalidTransition {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn set_mut(&mut self, index: usize) -> Result<&mut PlannedSet> {
        let len = self.sets.len();
        self.sets
            .get_mut(index)
            .ok_or(Error::InvalidIndex { index, len })
    }

    fn next_pending_after(&self, index: usize) -> Option<usize> {
        self.sets
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, s)| s.is_pending())
            .map(|(i, _)| i)
    }
}
