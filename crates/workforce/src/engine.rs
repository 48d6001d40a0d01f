use std::collections::BTreeMap;

use crate::error::WorkforceError;
use crate::model::{ParsedRow, RunMeta, WorkforceResult};
use crate::parse::load_csv_rows;
use crate::reconcile::reconcile_record;
use crate::select::select_latest;
use crate::summary::compute_summary;

/// Select the latest record per planet and reconcile its workforce.
pub fn run<I>(rows: I) -> WorkforceResult
where
    I: IntoIterator<Item = ParsedRow>,
{
    let selection = select_latest(rows);
    if selection.rows_dropped > 0 {
        log::info!(
            "dropped {} of {} feed rows with unusable timestamps",
            selection.rows_dropped,
            selection.rows_read
        );
    }

    let mut planets = BTreeMap::new();
    let mut outcomes = Vec::with_capacity(selection.table.len() * 5);
    for record in selection.table.iter() {
        let (derived, tier_outcomes) = reconcile_record(record);
        outcomes.extend(tier_outcomes);
        planets.insert(derived.entity_id.clone(), derived);
    }

    let summary = compute_summary(&selection, &outcomes);

    WorkforceResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        planets,
    }
}

/// [`run`] over a headered CSV feed.
pub fn run_csv(csv_data: &str) -> Result<WorkforceResult, WorkforceError> {
    Ok(run(load_csv_rows(csv_data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tier;

    #[test]
    fn run_csv_end_to_end() {
        let csv = "\
PlanetNaturalId,TimestampMs,PlanetName,ExplorersGraceEnabled,NextPopulationPioneer,UnemploymentRatePioneer,OpenJobsPioneer,PopulationDifferencePioneer
A,100,Alpha,False,1,0,0,0
A,300,Alpha,True,100,0.1,30,20
B,,Beta,False,5,0,0,0
C,50,Gamma,False,50,0.2,5,-40
";
        let result = run_csv(csv).unwrap();
        assert_eq!(result.summary.rows_read, 4);
        assert_eq!(result.summary.rows_dropped, 1);
        assert_eq!(result.summary.planets, 2);
        assert_eq!(result.planets.len(), 2);
        assert!(!result.planets.contains_key("B"));

        let a = &result.planets["A"];
        assert_eq!(a.timestamp, 300);
        assert!(a.explorers_grace);
        let p = a.workforce[&Tier::Pioneer];
        assert_eq!((p.population, p.unemployed, p.open_jobs), (100, 0, 2));

        let c = result.planets["C"].workforce[&Tier::Pioneer];
        assert_eq!((c.population, c.unemployed, c.open_jobs), (50, 0, 27));

        // A: 1 absorbed + 4 empty tiers; C: 5 shrink (pioneer + 4 empty)
        assert_eq!(result.summary.workers_absorbed, 1);
        assert_eq!(result.summary.jobs_scarce, 0);
        assert_eq!(result.summary.population_shrank, 9);
        assert_eq!(result.meta.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn run_csv_propagates_missing_column() {
        let err = run_csv("PlanetName\nAlpha\n").unwrap_err();
        assert!(matches!(err, WorkforceError::MissingColumn { .. }));
    }
}
