//! Latest-record selection: one snapshot per planet, the newest one.
//!
//! Replacement happens only on a strictly greater timestamp, so among
//! records sharing a planet's maximum timestamp the first one seen wins.
//! That tie-break is an artifact of stream order, not a preference.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::model::{ParsedRow, RawRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestRecordTable {
    records: BTreeMap<String, RawRecord>,
}

impl LatestRecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record. Returns `true` if it is now the retained one.
    pub fn offer(&mut self, record: RawRecord) -> bool {
        match self.records.entry(record.entity_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(mut slot) => {
                if record.timestamp_ms > slot.get().timestamp_ms {
                    slot.insert(record);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Combine two partial tables. `self` wins ties, so merging partitions
    /// in stream order keeps the first-seen rule.
    pub fn merge(mut self, other: LatestRecordTable) -> LatestRecordTable {
        for record in other.records.into_values() {
            self.offer(record);
        }
        self
    }

    pub fn get(&self, entity_id: &str) -> Option<&RawRecord> {
        self.records.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Retained records in planet id order.
    pub fn iter(&self) -> impl Iterator<Item = &RawRecord> {
        self.records.values()
    }
}

impl FromIterator<RawRecord> for LatestRecordTable {
    fn from_iter<I: IntoIterator<Item = RawRecord>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |mut table, record| {
            table.offer(record);
            table
        })
    }
}

/// Selection output plus the diagnostics of the scan.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub table: LatestRecordTable,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl Selection {
    fn absorb(mut self, row: ParsedRow) -> Self {
        self.rows_read += 1;
        match row {
            Ok(record) => {
                self.table.offer(record);
            }
            Err(rejection) => {
                log::debug!("dropping feed row: {rejection}");
                self.rows_dropped += 1;
            }
        }
        self
    }
}

/// Fold parsed rows into the latest record per planet.
pub fn select_latest<I>(rows: I) -> Selection
where
    I: IntoIterator<Item = ParsedRow>,
{
    rows.into_iter().fold(Selection::default(), Selection::absorb)
}
