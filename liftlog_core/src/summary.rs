//! Session summary production and aggregates.
//!
//! A summary keeps only completed sets, in plan order. Pending and skipped
//! sets are left out entirely rather than reported as zero.

use crate::{ExerciseTotals, PlannedSet, SessionSummary};

/// Build a summary from the elapsed time and the final set ledger
pub fn summarize(elapsed_seconds: u64, sets: &[PlannedSet]) -> SessionSummary {
    SessionSummary {
        duration_seconds: elapsed_seconds,
        completed_sets: sets.iter().filter(|s| s.is_completed()).cloned().collect(),
        ..Default::default()
    }
}

impl SessionSummary {
    /// Total recorded reps across completed sets
    pub fn total_reps(&self) -> u64 {
        self.completed_sets.iter().map(reps_of).sum()
    }

    /// Total volume (reps x weight); unweighted sets add nothing
    pub fn total_volume(&self) -> f64 {
        self.completed_sets.iter().map(volume_of).sum()
    }

    /// Per-exercise totals, ordered by first appearance in the plan
    pub fn exercise_totals(&self) -> Vec<ExerciseTotals> {
        let mut totals: Vec<(usize, ExerciseTotals)> = Vec::new();

        for set in &self.completed_sets {
            let slot = match totals.iter().position(|(i, _)| *i == set.exercise_index) {
                Some(pos) => pos,
                None => {
                    totals.push((
                        set.exercise_index,
                        ExerciseTotals {
                            exercise_name: set.exercise_name.clone(),
                            sets: 0,
                            reps: 0,
                            volume: 0.0,
                        },
                    ));
                    totals.len() - 1
                }
            };
            let entry = &mut totals[slot].1;
            entry.sets += 1;
            entry.reps += reps_of(set);
            entry.volume += volume_of(set);
        }

        totals.into_iter().map(|(_, t)| t).collect()
    }
}

fn reps_of(set: &PlannedSet) -> u64 {
    set.actual_reps.get().map(u64::from).unwrap_or(0)
}

fn volume_of(set: &PlannedSet) -> f64 {
    match set.actual_weight.get() {
        Some(weight) => reps_of(set) as f64 * weight,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Actual, SetStatus};

    fn set(
        exercise_index: usize,
        name: &str,
        set_number: u32,
        status: SetStatus,
        reps: Option<u32>,
        weight: Option<f64>,
    ) -> PlannedSet {
        PlannedSet {
            exercise_index,
            exercise_name: name.into(),
            set_number,
            target_reps: 10,
            target_weight: None,
            status,
            actual_reps: reps.into(),
            actual_weight: weight.into(),
        }
    }

    fn sample_ledger() -> Vec<PlannedSet> {
        vec![
            set(0, "Squat", 1, SetStatus::Completed, Some(5), Some(100.0)),
            set(0, "Squat", 2, SetStatus::Skipped, None, None),
            set(0, "Squat", 3, SetStatus::Completed, Some(4), Some(100.0)),
            set(1, "Dip", 1, SetStatus::Pending, None, None),
            set(1, "Dip", 2, SetStatus::Completed, Some(12), None),
        ]
    }

    #[test]
    fn test_summarize_keeps_only_completed_in_order() {
        let summary = summarize(600, &sample_ledger());

        assert_eq!(summary.duration_seconds, 600);
        let kept: Vec<(usize, u32)> = summary
            .completed_sets
            .iter()
            .map(|s| (s.exercise_index, s.set_number))
            .collect();
        assert_eq!(kept, vec![(0, 1), (0, 3), (1, 2)]);
        assert!(summary.routine_name.is_none());
        assert!(summary.ended_at.is_none());
    }

    #[test]
    fn test_summarize_empty_ledger() {
        let summary = summarize(0, &[]);
        assert_eq!(summary, SessionSummary::default());
    }

    #[test]
    fn test_totals() {
        let summary = summarize(600, &sample_ledger());

        assert_eq!(summary.total_reps(), 21);
        assert_eq!(summary.total_volume(), 900.0);
    }

    #[test]
    fn test_exercise_totals_in_plan_order() {
        let summary = summarize(600, &sample_ledger());
        let totals = summary.exercise_totals();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].exercise_name, "Squat");
        assert_eq!(totals[0].sets, 2);
        assert_eq!(totals[0].reps, 9);
        assert_eq!(totals[0].volume, 900.0);
        assert_eq!(totals[1].exercise_name, "Dip");
        assert_eq!(totals[1].sets, 1);
        assert_eq!(totals[1].volume, 0.0);
    }

    #[test]
    fn test_unrecorded_reps_count_as_nothing() {
        let mut ledger = sample_ledger();
        ledger[0].actual_reps = Actual::NotRecorded;

        let summary = summarize(1, &ledger);
        assert_eq!(summary.total_reps(), 16);
        assert_eq!(summary.total_volume(), 400.0);
    }
}
