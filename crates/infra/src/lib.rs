//! Infrastructure layer: background runners around the inventory service.

pub mod sweeper;

pub use sweeper::{ExpirySweeper, ExpirySweeperHandle, SweeperStats};
