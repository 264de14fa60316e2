//! Append-only stock event log.

use chrono::{DateTime, Utc};

use crate::stock::StockEvent;

/// In-memory, append-only log of stock deltas.
///
/// Iteration order is insertion order. Timestamps are *not* required to be
/// monotonic across entries, so consumers filtering by time must scan the
/// whole log rather than stop at the first later entry.
///
/// The log does no locking of its own; its owner serializes access.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<StockEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event. Never fails.
    pub fn append(&mut self, event: StockEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StockEvent> {
        self.events.iter()
    }

    /// Events stamped at or before `at`, in insertion order.
    pub fn up_to(&self, at: DateTime<Utc>) -> impl Iterator<Item = &StockEvent> {
        self.events.iter().filter(move |e| e.occurred_at <= at)
    }

    pub fn as_slice(&self) -> &[StockEvent] {
        &self.events
    }
}

impl FromIterator<StockEvent> for EventLog {
    fn from_iter<T: IntoIterator<Item = StockEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
