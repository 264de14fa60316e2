use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use stockhold_core::HoldId;
use stockhold_inventory::InventoryService;

use crate::app::{dto, errors};

pub async fn place_hold(
    Extension(service): Extension<Arc<InventoryService>>,
    body: Result<Json<dto::PlaceHoldRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::bad_request_body(rejection),
    };
    match service.place_hold(&body.item_id, &body.warehouse_id, body.amount) {
        Ok(hold_id) => (StatusCode::OK, Json(dto::PlaceHoldResponse { hold_id })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn execute_hold(
    Extension(service): Extension<Arc<InventoryService>>,
    body: Result<Json<dto::ExecuteHoldRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::bad_request_body(rejection),
    };
    // A malformed id cannot name an existing hold.
    let hold_id: HoldId = match body.hold_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("hold {} not found", body.hold_id),
            )
        }
    };

    match service.execute_hold(&body.item_id, &body.warehouse_id, hold_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(dto::ExecuteHoldResponse {
                hold_id,
                status: "executed",
            }),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
