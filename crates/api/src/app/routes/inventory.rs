use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};

use stockhold_inventory::InventoryService;

use crate::app::{dto, errors};

/// Net stock per key as of `?at=<RFC3339>` (default: now).
pub async fn get_snapshot(
    Extension(service): Extension<Arc<InventoryService>>,
    Query(query): Query<dto::SnapshotQuery>,
) -> axum::response::Response {
    let at = match query.at.as_deref().map(str::trim) {
        None | Some("") => service.now(),
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => t.with_timezone(&Utc),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_timestamp",
                    "invalid 'at' timestamp, expected RFC3339",
                )
            }
        },
    };

    let snapshot = service.snapshot(at);
    (StatusCode::OK, Json(snapshot)).into_response()
}

pub async fn get_record(
    Extension(service): Extension<Arc<InventoryService>>,
    Path((item_id, warehouse_id)): Path<(String, String)>,
) -> axum::response::Response {
    match service.record(&item_id, &warehouse_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
