use std::time::Instant;

use axum::{http::Request, middleware::Next, response::Response};
use tracing::info;

/// Log one line per request with method, path, status and latency.
pub async fn log_requests(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "request handled"
    );
    response
}
