//! Seed data: initial records plus the event history that produced them.

use chrono::{DateTime, Utc};

use stockhold_core::{DomainError, DomainResult, EventId};
use stockhold_events::StockEvent;

/// Initial state of one inventory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRecord {
    pub item_id: String,
    pub warehouse_id: String,
    pub available: u64,
}

/// Records plus an initial event log consistent with their history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    pub records: Vec<SeedRecord>,
    pub events: Vec<StockEvent>,
}

impl Seed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(
        mut self,
        item_id: impl Into<String>,
        warehouse_id: impl Into<String>,
        available: u64,
    ) -> Self {
        self.records.push(SeedRecord {
            item_id: item_id.into(),
            warehouse_id: warehouse_id.into(),
            available,
        });
        self
    }

    pub fn with_event(mut self, event: StockEvent) -> Self {
        self.events.push(event);
        self
    }

    /// A record with `quantity` available and the provisioning event behind it.
    ///
    /// Fails when `quantity` cannot be logged as a signed delta.
    pub fn with_provisioned(
        self,
        event_id: EventId,
        item_id: &str,
        warehouse_id: &str,
        quantity: u64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let delta = i64::try_from(quantity).map_err(|_| {
            DomainError::validation(format!("quantity {quantity} exceeds {}", i64::MAX))
        })?;
        Ok(self
            .with_record(item_id, warehouse_id, quantity)
            .with_event(StockEvent::provisioned(
                event_id,
                item_id,
                warehouse_id,
                delta,
                occurred_at,
            )))
    }
}
