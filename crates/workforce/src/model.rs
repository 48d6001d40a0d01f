use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Workforce skill tier. Declaration order is the feed's tier order and
/// drives the key order of serialized `Workforce` maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Pioneer,
    Settler,
    Technician,
    Engineer,
    Scientist,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Pioneer,
        Tier::Settler,
        Tier::Technician,
        Tier::Engineer,
        Tier::Scientist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pioneer => "Pioneer",
            Self::Settler => "Settler",
            Self::Technician => "Technician",
            Self::Engineer => "Engineer",
            Self::Scientist => "Scientist",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Reported figures for one tier. Absent or unparseable feed values are
/// already zero here, so reconciliation always sees defined numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TierReport {
    pub next_population: f64,
    pub unemployment_rate: f64,
    pub open_jobs: f64,
    pub population_difference: f64,
}

/// One feed observation for one planet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub entity_id: String,
    pub timestamp_ms: i64,
    pub entity_name: String,
    pub explorers_grace: bool,
    pub tiers: [TierReport; 5],
}

impl RawRecord {
    pub fn tier(&self, tier: Tier) -> &TierReport {
        &self.tiers[tier.index()]
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut TierReport {
        &mut self.tiers[tier.index()]
    }
}

/// Why a feed row could not take part in latest-record selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub entity_id: String,
    /// Raw `TimestampMs` value, `None` when the column was absent.
    pub timestamp: Option<String>,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.timestamp {
            Some(value) => write!(f, "planet '{}': unparseable timestamp '{value}'", self.entity_id),
            None => write!(f, "planet '{}': missing timestamp", self.entity_id),
        }
    }
}

/// A feed row after the parse boundary.
pub type ParsedRow = Result<RawRecord, RowRejection>;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkforceBreakdown {
    pub population: u64,
    pub unemployed: u64,
    pub open_jobs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    #[serde(rename = "PlanetNaturalId")]
    pub entity_id: String,
    #[serde(rename = "PlanetName")]
    pub entity_name: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "ExplorersGrace")]
    pub explorers_grace: bool,
    #[serde(rename = "Workforce")]
    pub workforce: BTreeMap<Tier, WorkforceBreakdown>,
}

/// Which matching branch a tier went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Every available worker found a reported opening.
    WorkersAbsorbed,
    /// More available workers than reported openings.
    JobsScarce,
    /// Population shrank past the previously unemployed pool.
    PopulationShrank,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkersAbsorbed => write!(f, "workers_absorbed"),
            Self::JobsScarce => write!(f, "jobs_scarce"),
            Self::PopulationShrank => write!(f, "population_shrank"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub planets: usize,
    pub workers_absorbed: usize,
    pub jobs_scarce: usize,
    pub population_shrank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkforceResult {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub planets: BTreeMap<String, DerivedRecord>,
}
