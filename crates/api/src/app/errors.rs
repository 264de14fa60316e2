use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::warn;

use stockhold_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    warn!(error = %err, "request rejected");
    match err {
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        DomainError::InsufficientStock { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_stock", err.to_string())
        }
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

/// Any JSON body rejection is reported as a 400.
pub fn bad_request_body(rejection: JsonRejection) -> axum::response::Response {
    warn!(status = rejection.status().as_u16(), "request body rejected");
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_request_body",
        rejection.body_text(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
