//! `stockhold-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, typed identifiers, inventory keys and the clock abstraction.

pub mod clock;
pub mod error;
pub mod id;
pub mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{EventId, HoldId, IdGenerator, SequentialIdGenerator, UuidV7Generator};
pub use key::{InventoryKey, KEY_SEPARATOR};
