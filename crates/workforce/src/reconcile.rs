//! Workforce reconciliation.
//!
//! The feed reports a population delta and an open-job count that need not
//! agree. For each tier we rebuild the previous state, work out how many
//! workers were available after the change, and match them against the
//! reported openings. Whatever does not match ends up on the other side of
//! the ledger (unfilled workers or unfilled jobs), so neither output can go
//! negative.

use std::collections::BTreeMap;

use crate::model::{DerivedRecord, MatchOutcome, RawRecord, Tier, TierReport, WorkforceBreakdown};
use crate::select::LatestRecordTable;

/// Full intermediate accounting for one tier. All values are unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierReconciliation {
    pub population: f64,
    pub previous_population: f64,
    pub previously_unemployed: f64,
    pub available_workers: f64,
    pub filled_jobs: f64,
    pub unemployed: f64,
    pub open_jobs: f64,
    pub outcome: MatchOutcome,
}

impl TierReconciliation {
    /// Truncate to the published integer triple.
    pub fn breakdown(&self) -> WorkforceBreakdown {
        // Float-to-int `as` casts truncate toward zero and saturate, so a
        // negative reported population lands on 0.
        WorkforceBreakdown {
            population: self.population as u64,
            unemployed: self.unemployed.max(0.0).floor() as u64,
            open_jobs: self.open_jobs.max(0.0).floor() as u64,
        }
    }
}

pub fn reconcile_tier(report: &TierReport) -> TierReconciliation {
    let pop = report.next_population;
    let diff = report.population_difference;
    let reported_open_jobs = report.open_jobs;

    let previous_population = pop - diff;
    // A reconstructed population below zero means `diff` overstated growth.
    let previously_unemployed = (previous_population.max(0.0) * report.unemployment_rate).floor();
    let available_workers = previously_unemployed + diff;

    let (filled_jobs, unemployed, open_jobs, outcome) = if available_workers > 0.0 {
        let filled = available_workers.min(reported_open_jobs);
        let outcome = if available_workers <= reported_open_jobs {
            MatchOutcome::WorkersAbsorbed
        } else {
            MatchOutcome::JobsScarce
        };
        (filled, available_workers - filled, reported_open_jobs - filled, outcome)
    } else {
        // Departed workers leave their jobs open.
        (
            0.0,
            0.0,
            reported_open_jobs + available_workers.abs(),
            MatchOutcome::PopulationShrank,
        )
    };

    TierReconciliation {
        population: pop,
        previous_population,
        previously_unemployed,
        available_workers,
        filled_jobs,
        unemployed,
        open_jobs,
        outcome,
    }
}

/// Reconcile every tier of one retained record.
pub fn reconcile_record(record: &RawRecord) -> (DerivedRecord, [MatchOutcome; 5]) {
    let mut workforce = BTreeMap::new();
    let outcomes = Tier::ALL.map(|tier| {
        let tier_rec = reconcile_tier(record.tier(tier));
        workforce.insert(tier, tier_rec.breakdown());
        tier_rec.outcome
    });

    let derived = DerivedRecord {
        entity_id: record.entity_id.clone(),
        entity_name: record.entity_name.clone(),
        timestamp: record.timestamp_ms,
        explorers_grace: record.explorers_grace,
        workforce,
    };
    (derived, outcomes)
}

/// Reconcile every planet in the table, keyed by planet id.
pub fn reconcile_table(table: &LatestRecordTable) -> BTreeMap<String, DerivedRecord> {
    table
        .iter()
        .map(|record| {
            let (derived, _) = reconcile_record(record);
            (derived.entity_id.clone(), derived)
        })
        .collect()
}
