//! `orbitmap-workforce` — planet workforce reconciliation engine.
//!
//! Pure engine crate: receives parsed feed rows, keeps the latest snapshot
//! per planet and returns the reconciled workforce breakdown.
//! No network or filesystem dependencies.

pub mod engine;
pub mod error;
pub mod model;
pub mod parse;
pub mod reconcile;
pub mod select;
pub mod summary;

pub use engine::{run, run_csv};
pub use error::WorkforceError;
pub use model::{DerivedRecord, RawRecord, Tier, TierReport, WorkforceBreakdown, WorkforceResult};
pub use select::LatestRecordTable;
