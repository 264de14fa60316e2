//! Point-in-time stock levels by event replay.
//!
//! A snapshot is never read from the live counters: it is recomputed from the
//! event log on every call, so the net value of a key at time T is derivable
//! independently of the current state of any record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use stockhold_core::InventoryKey;
use stockhold_events::StockEvent;

/// Net stock per key as of `at`.
///
/// Serializes as a flat map from composed key to net quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    at: DateTime<Utc>,
    levels: BTreeMap<InventoryKey, i64>,
}

impl Snapshot {
    /// Replay `events` in the given order, summing every delta stamped at or
    /// before `at`.
    ///
    /// Every key in `known_keys` starts at 0 and stays in the result even if
    /// no event qualifies. Keys that only appear in events are included too.
    /// Events are not sorted: insertion order is the replay order.
    pub fn replay<'a>(
        known_keys: impl IntoIterator<Item = &'a InventoryKey>,
        events: impl IntoIterator<Item = &'a StockEvent>,
        at: DateTime<Utc>,
    ) -> Self {
        let mut levels: BTreeMap<InventoryKey, i64> =
            known_keys.into_iter().map(|k| (k.clone(), 0)).collect();

        for event in events {
            if event.occurred_at > at {
                continue;
            }
            *levels.entry(event.key()).or_insert(0) += event.amount;
        }

        Self { at, levels }
    }

    /// The cutoff this snapshot was computed for.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn level(&self, key: &InventoryKey) -> Option<i64> {
        self.levels.get(key).copied()
    }

    pub fn get(&self, item_id: &str, warehouse_id: &str) -> Option<i64> {
        self.level(&InventoryKey::new(item_id, warehouse_id))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.levels.serialize(serializer)
    }
}
