use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;

use stockroom_core::DomainError;
use stockroom_inventory::{ErrorKind, InventoryError};

pub fn inventory_error_to_response(err: InventoryError, path: &str) -> axum::response::Response {
    let status = match err.kind() {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::Unavailable => {
            tracing::error!(error = %err, path, "inventory store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    json_error(status, err.public_message(), path)
}

pub fn domain_error_to_response(err: DomainError, path: &str) -> axum::response::Response {
    inventory_error_to_response(err.into(), path)
}

/// Error body: `{timestamp, status, error, message, path}`.
pub fn json_error(
    status: StatusCode,
    message: impl Into<String>,
    path: &str,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "timestamp": Utc::now(),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message.into(),
            "path": path,
        })),
    )
        .into_response()
}
