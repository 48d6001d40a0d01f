//! Parse boundary: named feed fields in, fully defined [`RawRecord`]s out.
//!
//! Every numeric tier field that is absent, empty, unparseable or
//! non-finite becomes `0.0` here. Only an unusable `TimestampMs` rejects a
//! row.

use std::collections::HashMap;

use crate::error::WorkforceError;
use crate::model::{ParsedRow, RawRecord, RowRejection, Tier, TierReport};

pub const COL_PLANET_ID: &str = "PlanetNaturalId";
pub const COL_TIMESTAMP: &str = "TimestampMs";
pub const COL_PLANET_NAME: &str = "PlanetName";
pub const COL_EXPLORERS_GRACE: &str = "ExplorersGraceEnabled";

/// Columns a feed header must carry for rows to be keyed and ordered.
pub const REQUIRED_COLUMNS: [&str; 2] = [COL_PLANET_ID, COL_TIMESTAMP];

/// Anything that can look up a raw feed value by field name.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// One CSV record viewed through its header.
pub struct CsvRow<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl FieldSource for CsvRow<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        self.columns.get(name).and_then(|&i| self.record.get(i))
    }
}

pub fn next_population_column(tier: Tier) -> String {
    format!("NextPopulation{tier}")
}

pub fn unemployment_rate_column(tier: Tier) -> String {
    format!("UnemploymentRate{tier}")
}

pub fn open_jobs_column(tier: Tier) -> String {
    format!("OpenJobs{tier}")
}

pub fn population_difference_column(tier: Tier) -> String {
    format!("PopulationDifference{tier}")
}

/// Numeric field or zero.
fn number_or_zero(fields: &impl FieldSource, name: &str) -> f64 {
    fields
        .field(name)
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn tier_report(fields: &impl FieldSource, tier: Tier) -> TierReport {
    TierReport {
        next_population: number_or_zero(fields, &next_population_column(tier)),
        unemployment_rate: number_or_zero(fields, &unemployment_rate_column(tier)),
        open_jobs: number_or_zero(fields, &open_jobs_column(tier)),
        population_difference: number_or_zero(fields, &population_difference_column(tier)),
    }
}

/// Turn one field mapping into a [`RawRecord`].
pub fn parse_record(fields: &impl FieldSource) -> ParsedRow {
    let entity_id = fields.field(COL_PLANET_ID).unwrap_or("").to_string();

    let raw_ts = fields.field(COL_TIMESTAMP);
    let timestamp_ms = match raw_ts.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(ts)) => ts,
        _ => {
            return Err(RowRejection {
                entity_id,
                timestamp: raw_ts.map(str::to_string),
            })
        }
    };

    let explorers_grace = fields
        .field(COL_EXPLORERS_GRACE)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    Ok(RawRecord {
        entity_id,
        timestamp_ms,
        entity_name: fields.field(COL_PLANET_NAME).unwrap_or("").to_string(),
        explorers_grace,
        tiers: Tier::ALL.map(|tier| tier_report(fields, tier)),
    })
}

/// Parse a headered CSV feed into rows ready for selection.
///
/// Rows may be shorter than the header; their trailing fields count as
/// absent. A leading UTF-8 BOM is ignored.
pub fn load_csv_rows(csv_data: &str) -> Result<Vec<ParsedRow>, WorkforceError> {
    let data = csv_data.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !columns.contains_key(column) {
            return Err(WorkforceError::MissingColumn { column: column.into() });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(parse_record(&CsvRow { columns: &columns, record: &record }));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn parse_full_record() {
        let row = fields(&[
            ("PlanetNaturalId", "KW-688c"),
            ("TimestampMs", "1700000000000"),
            ("PlanetName", "Etherwind"),
            ("ExplorersGraceEnabled", "True"),
            ("NextPopulationPioneer", "100"),
            ("UnemploymentRatePioneer", "0.1"),
            ("OpenJobsPioneer", "30"),
            ("PopulationDifferencePioneer", "20"),
        ]);
        let rec = parse_record(&row).unwrap();
        assert_eq!(rec.entity_id, "KW-688c");
        assert_eq!(rec.timestamp_ms, 1_700_000_000_000);
        assert_eq!(rec.entity_name, "Etherwind");
        assert!(rec.explorers_grace);

        let p = rec.tier(Tier::Pioneer);
        assert_eq!(p.next_population, 100.0);
        assert_eq!(p.unemployment_rate, 0.1);
        assert_eq!(p.open_jobs, 30.0);
        assert_eq!(p.population_difference, 20.0);
        assert_eq!(*rec.tier(Tier::Scientist), TierReport::default());
    }

    #[test]
    fn unusable_numbers_default_to_zero() {
        let row = fields(&[
            ("PlanetNaturalId", "A"),
            ("TimestampMs", "5"),
            ("NextPopulationSettler", ""),
            ("UnemploymentRateSettler", "n/a"),
            ("OpenJobsSettler", "NaN"),
            ("PopulationDifferenceSettler", "inf"),
        ]);
        let rec = parse_record(&row).unwrap();
        assert_eq!(*rec.tier(Tier::Settler), TierReport::default());
    }

    #[test]
    fn numbers_are_trimmed() {
        let row = fields(&[
            ("PlanetNaturalId", "A"),
            ("TimestampMs", " 42 "),
            ("OpenJobsEngineer", " -3.5 "),
        ]);
        let rec = parse_record(&row).unwrap();
        assert_eq!(rec.timestamp_ms, 42);
        assert_eq!(rec.tier(Tier::Engineer).open_jobs, -3.5);
    }

    #[test]
    fn bad_timestamp_rejects_row() {
        let row = fields(&[("PlanetNaturalId", "A"), ("TimestampMs", "1.5e12")]);
        let err = parse_record(&row).unwrap_err();
        assert_eq!(err.entity_id, "A");
        assert_eq!(err.timestamp.as_deref(), Some("1.5e12"));
        assert!(err.to_string().contains("unparseable timestamp"));

        let row = fields(&[("PlanetNaturalId", "B")]);
        let err = parse_record(&row).unwrap_err();
        assert_eq!(err.timestamp, None);
        assert!(err.to_string().contains("missing timestamp"));
    }

    #[test]
    fn explorers_grace_flag() {
        for (value, expected) in [("True", true), ("true", true), ("False", false), ("1", false), ("", false)] {
            let row = fields(&[
                ("PlanetNaturalId", "A"),
                ("TimestampMs", "1"),
                ("ExplorersGraceEnabled", value),
            ]);
            assert_eq!(parse_record(&row).unwrap().explorers_grace, expected, "value {value:?}");
        }
    }

    #[test]
    fn load_csv_basic() {
        let csv = "\
PlanetNaturalId,TimestampMs,PlanetName,ExplorersGraceEnabled,NextPopulationPioneer,OpenJobsPioneer
A,100,Alpha,True,500,12
B,bad,Beta,False,10,1
A,200,Alpha,False,510,8
";
        let rows = load_csv_rows(csv).unwrap();
        assert_eq!(rows.len(), 3);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.entity_name, "Alpha");
        assert_eq!(first.tier(Tier::Pioneer).next_population, 500.0);
        assert!(rows[1].is_err());
        assert_eq!(rows[2].as_ref().unwrap().timestamp_ms, 200);
    }

    #[test]
    fn load_csv_short_rows_and_bom() {
        let csv = "\u{feff}PlanetNaturalId,TimestampMs,PlanetName,NextPopulationPioneer\nA,7\n";
        let rows = load_csv_rows(csv).unwrap();
        let rec = rows[0].as_ref().unwrap();
        assert_eq!(rec.entity_id, "A");
        assert_eq!(rec.entity_name, "");
        assert_eq!(rec.tier(Tier::Pioneer).next_population, 0.0);
    }

    #[test]
    fn load_csv_missing_required_column() {
        let csv = "PlanetNaturalId,PlanetName\nA,Alpha\n";
        let err = load_csv_rows(csv).unwrap_err();
        assert!(err.to_string().contains("'TimestampMs'"));
    }

    #[test]
    fn column_names_follow_feed_contract() {
        assert_eq!(next_population_column(Tier::Technician), "NextPopulationTechnician");
        assert_eq!(unemployment_rate_column(Tier::Pioneer), "UnemploymentRatePioneer");
        assert_eq!(open_jobs_column(Tier::Scientist), "OpenJobsScientist");
        assert_eq!(population_difference_column(Tier::Engineer), "PopulationDifferenceEngineer");
    }
}
