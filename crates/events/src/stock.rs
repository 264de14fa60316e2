//! Stock delta events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockhold_core::{EventId, HoldId, InventoryKey};

use crate::event::Event;

/// Why a stock delta was recorded.
///
/// Descriptive only: replay sums `amount` regardless of kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockEventKind {
    /// Stock provisioned to a key (seed/import). Positive.
    Provisioned,
    /// A hold was placed. Negative.
    HoldPlaced,
    /// A hold expired and its amount was returned. Positive.
    HoldExpired,
}

/// Immutable signed stock delta applied to one (item, warehouse) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEvent {
    pub event_id: EventId,
    pub item_id: String,
    pub warehouse_id: String,
    /// Signed delta: negative for placements, positive for provisioning and expiry.
    pub amount: i64,
    pub kind: StockEventKind,
    /// Hold this delta belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_id: Option<HoldId>,
    pub occurred_at: DateTime<Utc>,
}

impl StockEvent {
    pub fn provisioned(
        event_id: EventId,
        item_id: impl Into<String>,
        warehouse_id: impl Into<String>,
        quantity: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            item_id: item_id.into(),
            warehouse_id: warehouse_id.into(),
            amount: quantity,
            kind: StockEventKind::Provisioned,
            hold_id: None,
            occurred_at,
        }
    }

    /// Placement of `units` against a key; recorded as `-units`.
    pub fn hold_placed(
        event_id: EventId,
        item_id: impl Into<String>,
        warehouse_id: impl Into<String>,
        hold_id: HoldId,
        units: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            item_id: item_id.into(),
            warehouse_id: warehouse_id.into(),
            amount: -units,
            kind: StockEventKind::HoldPlaced,
            hold_id: Some(hold_id),
            occurred_at,
        }
    }

    /// Return of `units` from an expired hold; recorded as `+units`.
    pub fn hold_expired(
        event_id: EventId,
        item_id: impl Into<String>,
        warehouse_id: impl Into<String>,
        hold_id: HoldId,
        units: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            item_id: item_id.into(),
            warehouse_id: warehouse_id.into(),
            amount: units,
            kind: StockEventKind::HoldExpired,
            hold_id: Some(hold_id),
            occurred_at,
        }
    }

    pub fn key(&self) -> InventoryKey {
        InventoryKey::new(&self.item_id, &self.warehouse_id)
    }
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            StockEventKind::Provisioned => "inventory.stock.provisioned",
            StockEventKind::HoldPlaced => "inventory.hold.placed",
            StockEventKind::HoldExpired => "inventory.hold.expired",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockhold_core::{IdGenerator, SequentialIdGenerator};

    #[test]
    fn placement_and_expiry_carry_opposite_signs() {
        let ids = SequentialIdGenerator::new();
        let hold = ids.hold_id();
        let now = Utc::now();

        let placed = StockEvent::hold_placed(ids.event_id(), "ABC123", "WH1", hold, 30, now);
        let expired = StockEvent::hold_expired(ids.event_id(), "ABC123", "WH1", hold, 30, now);

        assert_eq!(placed.amount, -30);
        assert_eq!(expired.amount, 30);
        assert_eq!(placed.event_type(), "inventory.hold.placed");
        assert_eq!(expired.event_type(), "inventory.hold.expired");
        assert_eq!(placed.key().as_str(), "ABC123:WH1");
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let ids = SequentialIdGenerator::new();
        let ev = StockEvent::provisioned(ids.event_id(), "ABC123", "WH1", 100, Utc::now());
        let json = serde_json::to_value(&ev).unwrap();

        assert_eq!(json["kind"], "provisioned");
        assert_eq!(json["amount"], 100);
        assert!(json.get("hold_id").is_none());
    }
}
