//! Set plan generation.
//!
//! Expands a routine's exercise list into the flat, ordered sequence of
//! sets that a session works through. All sets of exercise 0 come before
//! any set of exercise 1, and set numbers ascend within an exercise.

use crate::{Actual, PlannedSet, Routine, SetStatus};

/// Generate the flat set plan for a routine
///
/// Exercises with a non-positive planned set count contribute no sets.
/// Every emitted set starts `Pending` with nothing recorded.
pub fn generate(routine: &Routine) -> Vec<PlannedSet> {
    let capacity = routine
        .exercises
        .iter()
        .map(|e| e.planned_sets.max(0) as usize)
        .sum();
    let mut sets = Vec::with_capacity(capacity);

    for (exercise_index, exercise) in routine.exercises.iter().enumerate() {
        if exercise.planned_sets <= 0 {
            tracing::debug!(
                "Exercise '{}' has {} planned sets, emitting none",
                exercise.name,
                exercise.planned_sets
            );
            continue;
        }

        for set_number in 1..=exercise.planned_sets as u32 {
            sets.push(PlannedSet {
                exercise_index,
                exercise_name: exercise.name.clone(),
                set_number,
                target_reps: exercise.planned_reps,
                target_weight: exercise.planned_weight,
                status: SetStatus::Pending,
                actual_reps: Actual::NotRecorded,
                actual_weight: Actual::NotRecorded,
            });
        }
    }

    sets
}
