//! Upsert of freshly extracted records into the persisted store

use crate::record::{RecordStore, TaxRecord};
use std::collections::hash_map::Entry;
use std::fmt;

/// Change accounting for one merge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Tax IDs not present before
    pub new: usize,
    /// Known tax IDs whose fields changed
    pub updated: usize,
    /// Known tax IDs identical to the stored entry
    pub unchanged: usize,
}

impl MergeStats {
    /// Whether the merge modified the store
    pub fn has_changes(&self) -> bool {
        self.new > 0 || self.updated > 0
    }

    pub fn total(&self) -> usize {
        self.new + self.updated + self.unchanged
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "New={} | Updated={} | Unchanged={}",
            self.new, self.updated, self.unchanged
        )
    }
}

/// Merges `incoming` into `existing`, keyed by tax ID
///
/// Unknown tax IDs are inserted. Known ones are overwritten field by field
/// when anything differs. Nothing is ever removed, so the store accumulates
/// every organization seen across runs. Repeated tax IDs within `incoming`
/// are applied in order; each occurrence is counted.
pub fn merge(existing: &mut RecordStore, incoming: Vec<TaxRecord>) -> MergeStats {
    let mut stats = MergeStats::default();

    for record in incoming {
        match existing.entry(record.tax_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                stats.new += 1;
            }
            Entry::Occupied(mut slot) => {
                if slot.get_mut().merge_from(record) {
                    stats.updated += 1;
                } else {
                    stats.unchanged += 1;
                }
            }
        }
    }

    tracing::info!("Sync stats: {}", stats);
    stats
}
