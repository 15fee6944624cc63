//! # Location Store
//!
//! Concurrent map from client id to its latest [`PositionRecord`].
//!
//! ## Thread Safety
//!
//! The store is shared across connection tasks via `Arc`. Compare-and-update
//! runs inside the map entry's shard lock, so the freshness check and the
//! install happen as one step for a given client id. Two racing reports for
//! the same client can never both be reported as new, and the older one can
//! never overwrite the newer one.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use crate::domain::{invariant_strictly_newer, PositionRecord};

/// Result of a compare-and-update.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// No record existed for this client.
    Inserted,
    /// A strictly older record was replaced.
    Replaced { previous: PositionRecord },
    /// The candidate was not newer; the stored record is unchanged.
    Stale { current: PositionRecord },
}

impl UpdateOutcome {
    /// True when the candidate was installed, i.e. it is new information
    /// that should be flooded onward.
    pub fn is_new(&self) -> bool {
        !matches!(self, UpdateOutcome::Stale { .. })
    }
}

/// Client id → latest position record.
#[derive(Debug, Default)]
pub struct LocationStore {
    records: DashMap<String, PositionRecord>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Install `candidate` if no record exists for its client or if it is
    /// strictly newer than the stored one.
    pub fn compare_and_update(&self, candidate: PositionRecord) -> UpdateOutcome {
        match self.records.entry(candidate.client_id.clone()) {
            Entry::Vacant(slot) => {
                trace!(client_id = %candidate.client_id, "Inserting first position");
                slot.insert(candidate);
                UpdateOutcome::Inserted
            }
            Entry::Occupied(mut slot) => {
                if invariant_strictly_newer(&candidate, slot.get()) {
                    trace!(
                        client_id = %candidate.client_id,
                        client_time = %candidate.client_time,
                        "Replacing older position"
                    );
                    let previous = slot.insert(candidate);
                    UpdateOutcome::Replaced { previous }
                } else {
                    UpdateOutcome::Stale {
                        current: slot.get().clone(),
                    }
                }
            }
        }
    }

    /// Latest record for `client_id`, if any.
    pub fn get(&self, client_id: &str) -> Option<PositionRecord> {
        self.records.get(client_id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of every stored record, sorted by client id.
    pub fn snapshot(&self) -> Vec<PositionRecord> {
        let mut records: Vec<PositionRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.client_id.cmp(&b.client_id));
        records
    }
}
