//! Inventory record: reservable state of one (item, warehouse) pair.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use stockhold_core::{DomainError, DomainResult, HoldId, InventoryKey};

use crate::hold::Hold;

/// Current reservable state of one (item, warehouse) pair.
///
/// Identity is immutable; the counters live behind the record's own lock.
#[derive(Debug)]
pub struct InventoryRecord {
    item_id: String,
    warehouse_id: String,
    key: InventoryKey,
    state: Mutex<RecordState>,
}

/// Lock-guarded counters of a record.
#[derive(Debug, Default)]
pub struct RecordState {
    available: u64,
    holds: HashMap<HoldId, Hold>,
}

impl InventoryRecord {
    pub fn new(item_id: impl Into<String>, warehouse_id: impl Into<String>, available: u64) -> Self {
        let item_id = item_id.into();
        let warehouse_id = warehouse_id.into();
        let key = InventoryKey::new(&item_id, &warehouse_id);
        Self {
            item_id,
            warehouse_id,
            key,
            state: Mutex::new(RecordState {
                available,
                holds: HashMap::new(),
            }),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    pub fn key(&self) -> &InventoryKey {
        &self.key
    }

    /// Acquire the record lock.
    ///
    /// Callers must already hold the service-wide lock. Every mutation on
    /// `RecordState` checks first and mutates last, so a poisoned guard still
    /// holds consistent counters and is recovered.
    pub fn lock(&self) -> MutexGuard<'_, RecordState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point-in-time copy of the record for read APIs.
    pub fn view(&self) -> RecordView {
        let state = self.lock();
        let mut holds: Vec<Hold> = state.holds.values().cloned().collect();
        holds.sort_by_key(|h| (h.created_at, h.hold_id));
        RecordView {
            item_id: self.item_id.clone(),
            warehouse_id: self.warehouse_id.clone(),
            available: state.available,
            holds,
        }
    }
}

impl RecordState {
    pub fn available(&self) -> u64 {
        self.available
    }

    pub fn hold(&self, hold_id: &HoldId) -> Option<&Hold> {
        self.holds.get(hold_id)
    }

    pub fn hold_count(&self) -> usize {
        self.holds.len()
    }

    /// Sum of all active hold amounts.
    pub fn reserved(&self) -> u64 {
        self.holds.values().map(|h| h.amount).sum()
    }

    /// Subtract the hold's amount from available and track the hold.
    pub fn reserve(&mut self, hold: Hold) -> DomainResult<()> {
        if hold.amount > self.available {
            return Err(DomainError::insufficient_stock(hold.amount, self.available));
        }
        if self.holds.contains_key(&hold.hold_id) {
            return Err(DomainError::conflict(format!(
                "hold {} already exists",
                hold.hold_id
            )));
        }
        self.available -= hold.amount;
        self.holds.insert(hold.hold_id, hold);
        Ok(())
    }

    /// Remove a hold for good. Available is untouched: the amount was
    /// already taken out at placement and is now consumed.
    pub fn consume(&mut self, hold_id: &HoldId) -> DomainResult<Hold> {
        self.holds
            .remove(hold_id)
            .ok_or_else(|| DomainError::not_found(format!("hold {hold_id}")))
    }

    /// Ids of holds older than `ttl` at `now`.
    pub fn expired_holds(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<HoldId> {
        self.holds
            .values()
            .filter(|h| h.is_expired(now, ttl))
            .map(|h| h.hold_id)
            .collect()
    }

    /// Remove a hold and return its amount to available.
    pub fn release(&mut self, hold_id: &HoldId) -> Option<Hold> {
        let hold = self.holds.remove(hold_id)?;
        self.available += hold.amount;
        Some(hold)
    }
}

/// Read-only copy of an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub item_id: String,
    pub warehouse_id: String,
    pub available: u64,
    /// Active holds, oldest first.
    pub holds: Vec<Hold>,
}

impl RecordView {
    pub fn reserved(&self) -> u64 {
        self.holds.iter().map(|h| h.amount).sum()
    }
}
