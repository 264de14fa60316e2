//! Stock events and the append-only event log.
//!
//! The log is the sole source of truth for historical stock levels: every
//! snapshot is recomputed by replaying it.

pub mod event;
pub mod log;
pub mod stock;

pub use event::Event;
pub use log::EventLog;
pub use stock::{StockEvent, StockEventKind};
