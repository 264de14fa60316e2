//! Inventory service: hold manager and snapshot entrypoint.
//!
//! ## Locking
//!
//! Two levels of mutual exclusion:
//!
//! 1. `state` (service-wide) guards the registry key space and the event log.
//! 2. Each [`InventoryRecord`] guards its own available count and hold set.
//!
//! Acquisition order is always service lock, then record lock. No code path
//! takes a record lock and then reaches for the service lock. Every public
//! operation holds the service lock for its whole duration, which serializes
//! all mutation and every snapshot process-wide.
//!
//! Inside a critical section all checks, clock reads and id generation happen
//! before the first mutation, so a panic can never leave a record half
//! updated and a poisoned lock is safe to recover.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use stockhold_core::{
    Clock, DomainError, DomainResult, EventId, HoldId, IdGenerator, InventoryKey, SystemClock,
    UuidV7Generator,
};
use stockhold_events::{Event, EventLog, StockEvent};

use crate::hold::Hold;
use crate::record::{InventoryRecord, RecordView};
use crate::registry::InventoryRegistry;
use crate::seed::Seed;
use crate::snapshot::Snapshot;

/// State behind the service-wide lock.
#[derive(Debug, Default)]
struct ServiceState {
    registry: InventoryRegistry,
    log: EventLog,
}

/// Outcome of one expiry sweep.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Records visited.
    pub records_scanned: usize,
    /// Holds that expired and were returned to available stock.
    pub holds_released: usize,
    /// Total units returned.
    pub units_released: u64,
}

/// Shared, thread-safe inventory reservation service.
pub struct InventoryService {
    state: Mutex<ServiceState>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl core::fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryService").finish_non_exhaustive()
    }
}

impl Default for InventoryService {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidV7Generator))
    }
}

impl InventoryService {
    /// Empty service with injected time and id sources.
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Mutex::new(ServiceState::default()),
            clock,
            ids,
        }
    }

    /// Service pre-loaded with seed records and their event history.
    ///
    /// Seed events are appended as given, in order.
    pub fn from_seed(
        seed: Seed,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> DomainResult<Self> {
        let mut registry = InventoryRegistry::new();
        for rec in seed.records {
            InventoryKey::checked(&rec.item_id, &rec.warehouse_id)?;
            to_delta(rec.available)?;
            registry.insert(InventoryRecord::new(rec.item_id, rec.warehouse_id, rec.available))?;
        }
        let log: EventLog = seed.events.into_iter().collect();

        info!(
            records = registry.len(),
            events = log.len(),
            "inventory service seeded"
        );

        Ok(Self {
            state: Mutex::new(ServiceState { registry, log }),
            clock,
            ids,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new record with `quantity` available and append its
    /// provisioning event.
    pub fn provision(
        &self,
        item_id: &str,
        warehouse_id: &str,
        quantity: u64,
    ) -> DomainResult<EventId> {
        let key = InventoryKey::checked(item_id, warehouse_id)?;
        let delta = to_delta(quantity)?;

        let mut state = self.lock_state();
        if state.registry.contains(&key) {
            return Err(DomainError::conflict(format!("item {key} already provisioned")));
        }

        let event_id = self.ids.event_id();
        let now = self.clock.now();
        let ServiceState { registry, log } = &mut *state;
        registry.insert(InventoryRecord::new(item_id, warehouse_id, quantity))?;
        log.append(StockEvent::provisioned(event_id, item_id, warehouse_id, delta, now));

        debug!(key = %key, quantity, "inventory provisioned");
        Ok(event_id)
    }

    /// Reserve `amount` units of (item, warehouse).
    ///
    /// On success available drops by `amount`, a new hold is tracked and a
    /// `-amount` event is appended. On failure nothing changes.
    pub fn place_hold(
        &self,
        item_id: &str,
        warehouse_id: &str,
        amount: u64,
    ) -> DomainResult<HoldId> {
        if amount == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        let units = to_delta(amount)?;
        let key = InventoryKey::new(item_id, warehouse_id);

        let mut state = self.lock_state();
        let ServiceState { registry, log } = &mut *state;
        let record = registry.get(&key)?;
        let mut counters = record.lock();

        if counters.available() < amount {
            return Err(DomainError::insufficient_stock(amount, counters.available()));
        }

        let hold_id = self.ids.hold_id();
        let event_id = self.ids.event_id();
        let now = self.clock.now();

        counters.reserve(Hold::new(hold_id, amount, now))?;
        let event = StockEvent::hold_placed(event_id, item_id, warehouse_id, hold_id, units, now);
        debug!(
            key = %key,
            hold_id = %hold_id,
            amount,
            available = counters.available(),
            event_type = event.event_type(),
            "hold placed"
        );
        log.append(event);

        Ok(hold_id)
    }

    /// Finalize a hold: its amount is consumed for good.
    ///
    /// Available is not touched (it was decremented at placement) and no
    /// event is appended. Executing the same hold twice fails with `NotFound`.
    pub fn execute_hold(
        &self,
        item_id: &str,
        warehouse_id: &str,
        hold_id: HoldId,
    ) -> DomainResult<()> {
        let key = InventoryKey::new(item_id, warehouse_id);

        let state = self.lock_state();
        let record = state.registry.get(&key)?;
        let mut counters = record.lock();
        let hold = counters.consume(&hold_id)?;

        debug!(key = %key, hold_id = %hold_id, amount = hold.amount, "hold executed");
        Ok(())
    }

    /// Expire every hold older than `ttl`, returning its amount to available
    /// and appending a `+amount` event stamped with the sweep's current time.
    ///
    /// Visits every record. Cannot fail.
    pub fn release_expired_holds(&self, ttl: Duration) -> SweepReport {
        let ttl = chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX);

        let mut state = self.lock_state();
        let ServiceState { registry, log } = &mut *state;
        let now = self.clock.now();
        let mut report = SweepReport::default();

        for record in registry.records() {
            report.records_scanned += 1;
            let mut counters = record.lock();

            for hold_id in counters.expired_holds(now, ttl) {
                let event_id = self.ids.event_id();
                let stamped_at = self.clock.now();
                let Some(hold) = counters.release(&hold_id) else {
                    continue;
                };
                // Bounded by `to_delta` at placement.
                let units = hold.amount as i64;
                log.append(StockEvent::hold_expired(
                    event_id,
                    record.item_id(),
                    record.warehouse_id(),
                    hold_id,
                    units,
                    stamped_at,
                ));

                report.holds_released += 1;
                report.units_released += hold.amount;
                debug!(
                    key = %record.key(),
                    hold_id = %hold_id,
                    amount = hold.amount,
                    available = counters.available(),
                    "hold expired"
                );
            }
        }

        if report.holds_released > 0 {
            info!(
                holds_released = report.holds_released,
                units_released = report.units_released,
                records_scanned = report.records_scanned,
                "expired holds released"
            );
        }
        report
    }

    /// Net stock per key as of `at`, by full replay of the event log.
    pub fn snapshot(&self, at: DateTime<Utc>) -> Snapshot {
        let state = self.lock_state();
        let snapshot = Snapshot::replay(state.registry.keys(), state.log.iter(), at);

        debug!(at = %at, keys = snapshot.len(), events = state.log.len(), "snapshot computed");
        snapshot
    }

    /// Snapshot as of the clock's current time.
    pub fn snapshot_now(&self) -> Snapshot {
        let at = self.clock.now();
        self.snapshot(at)
    }

    /// Current state of one record.
    pub fn record(&self, item_id: &str, warehouse_id: &str) -> DomainResult<RecordView> {
        let key = InventoryKey::new(item_id, warehouse_id);
        let state = self.lock_state();
        Ok(state.registry.get(&key)?.view())
    }

    /// Copy of the full event log in insertion order.
    pub fn events(&self) -> Vec<StockEvent> {
        self.lock_state().log.as_slice().to_vec()
    }

    pub fn event_count(&self) -> usize {
        self.lock_state().log.len()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Quantities are tracked unsigned but logged as signed deltas.
fn to_delta(amount: u64) -> DomainResult<i64> {
    i64::try_from(amount)
        .map_err(|_| DomainError::validation(format!("amount {amount} exceeds {}", i64::MAX)))
}
