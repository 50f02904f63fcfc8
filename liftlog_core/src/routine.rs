//! Routine loading and the built-in default routine.
//!
//! Routines normally come from the routine-management side of the app. For
//! the CLI they can be read from a TOML or JSON file, or the built-in routine
//! is used.

use crate::{Error, Result, Routine, RoutineExercise};
use once_cell::sync::Lazy;
use std::path::Path;

/// Cached default routine - built once and reused
static DEFAULT_ROUTINE: Lazy<Routine> = Lazy::new(build_default_routine);

/// Get a reference to the cached default routine
pub fn default_routine() -> &'static Routine {
    &DEFAULT_ROUTINE
}

fn build_default_routine() -> Routine {
    let exercise = |position: u32, name: &str, sets, reps, weight| RoutineExercise {
        name: name.into(),
        planned_sets: sets,
        planned_reps: reps,
        planned_weight: weight,
        position,
        notes: None,
    };

    Routine {
        name: "Full Body".into(),
        description: Some("Built-in three exercise routine".into()),
        exercises: vec![
            exercise(0, "Goblet Squat", 3, 10, Some(16.0)),
            exercise(1, "Push-up", 3, 12, None),
            exercise(2, "Kettlebell Row", 3, 10, Some(16.0)),
        ],
    }
}

impl Routine {
    /// Load a routine from a file
    ///
    /// `.toml` files are parsed as TOML, anything else as JSON. Exercises
    /// are ordered by their `position` (stable for equal positions).
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Routine(format!("Failed to read routine {:?}: {}", path, e))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let mut routine: Routine = if is_toml {
            toml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };
        routine.exercises.sort_by_key(|e| e.position);

        tracing::info!(
            "Loaded routine '{}' ({} exercises) from {:?}",
            routine.name,
            routine.exercises.len(),
            path
        );
        Ok(routine)
    }

    /// Total number of sets the plan will contain
    pub fn planned_set_count(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| e.planned_sets.max(0) as usize)
            .sum()
    }

    /// Check the routine for suspicious content
    ///
    /// The session engine accepts any routine; these are advisory only.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("Routine has empty name".to_string());
        }
        if self.exercises.is_empty() {
            problems.push(format!("Routine '{}' has no exercises", self.name));
        }

        for exercise in &self.exercises {
            if exercise.name.trim().is_empty() {
                problems.push(format!(
                    "Exercise at position {} has empty name",
                    exercise.position
                ));
            }
            if exercise.planned_sets <= 0 {
                problems.push(format!(
                    "Exercise '{}' has {} planned sets and will be left out",
                    exercise.name, exercise.planned_sets
                ));
            }
            if exercise.planned_reps == 0 {
                problems.push(format!("Exercise '{}' has zero planned reps", exercise.name));
            }
            if let Some(weight) = exercise.planned_weight {
                if weight < 0.0 || weight.is_nan() {
                    problems.push(format!(
                        "Exercise '{}' has invalid weight {}",
                        exercise.name, weight
                    ));
                }
            }
        }

        problems
    }
}
