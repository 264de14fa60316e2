//! Inventory reservation domain.
//!
//! Tracks available stock per (item, warehouse) key, runs the two-phase hold
//! protocol (place, then execute or expire) and rebuilds historical stock
//! levels by replaying the append-only event log.
//!
//! Everything here is in-process and synchronous (no IO, no HTTP, no storage).

pub mod hold;
pub mod record;
pub mod registry;
pub mod seed;
pub mod service;
pub mod snapshot;

pub use hold::Hold;
pub use record::{InventoryRecord, RecordState, RecordView};
pub use registry::InventoryRegistry;
pub use seed::{Seed, SeedRecord};
pub use service::{InventoryService, SweepReport};
pub use snapshot::Snapshot;
