use axum::{
    routing::{get, post},
    Router,
};

pub mod holds;
pub mod inventory;
pub mod system;

/// Router for every endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/place_hold", post(holds::place_hold))
        .route("/execute_hold", post(holds::execute_hold))
        .route("/inventory_snapshot", get(inventory::get_snapshot))
        .route("/inventory/:item_id/:warehouse_id", get(inventory::get_record))
}
