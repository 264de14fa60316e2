use serde::{Deserialize, Serialize};

use stockhold_core::HoldId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct PlaceHoldRequest {
    pub item_id: String,
    pub warehouse_id: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteHoldRequest {
    pub item_id: String,
    pub warehouse_id: String,
    /// Kept as a string so malformed ids surface as unknown holds.
    pub hold_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    /// RFC3339 timestamp; absent or empty means now.
    pub at: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PlaceHoldResponse {
    pub hold_id: HoldId,
}

#[derive(Debug, Serialize)]
pub struct ExecuteHoldResponse {
    pub hold_id: HoldId,
    pub status: &'static str,
}
