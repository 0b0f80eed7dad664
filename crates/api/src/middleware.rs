use std::time::Instant;

use axum::{
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wrap each request in an `http.request` span and log its outcome.
///
/// A caller-supplied `x-request-id` is reused; otherwise one is generated.
/// The id is echoed on the response.
pub async fn request_tracing(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
