use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::AppServices;
use crate::config::StoreBackend;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let store = match services.backend() {
        StoreBackend::InMemory => "in_memory",
        StoreBackend::Postgres => "postgres",
    };
    Json(serde_json::json!({
        "status": "ok",
        "store": store,
    }))
}
