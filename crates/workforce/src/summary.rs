use crate::model::{MatchOutcome, RunSummary};
use crate::select::Selection;

/// Compute summary statistics from a selection scan and the tier outcomes
/// of the planets it retained.
pub fn compute_summary(selection: &Selection, outcomes: &[MatchOutcome]) -> RunSummary {
    let mut summary = RunSummary {
        rows_read: selection.rows_read,
        rows_dropped: selection.rows_dropped,
        planets: selection.table.len(),
        ..RunSummary::default()
    };

    for outcome in outcomes {
        match outcome {
            MatchOutcome::WorkersAbsorbed => summary.workers_absorbed += 1,
            MatchOutcome::JobsScarce => summary.jobs_scarce += 1,
            MatchOutcome::PopulationShrank => summary.population_shrank += 1,
        }
    }

    summary
}
