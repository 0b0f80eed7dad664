use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, OriginalUri, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};

use stockroom_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route("/:product_id", get(get_inventory).delete(delete_inventory))
        .route("/:product_id/adjust", patch(adjust_inventory))
}

pub async fn create_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<dto::CreateInventoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text(), uri.path());
        }
    };

    let cmd = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e, uri.path()),
    };

    match services.inventory().create(cmd).await {
        Ok(rec) => (StatusCode::CREATED, Json(dto::InventoryResponse::from(rec))).into_response(),
        Err(e) => errors::inventory_error_to_response(e, uri.path()),
    }
}

pub async fn get_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e, uri.path()),
    };

    match services.inventory().get(product_id).await {
        Ok(rec) => (StatusCode::OK, Json(dto::InventoryResponse::from(rec))).into_response(),
        Err(e) => errors::inventory_error_to_response(e, uri.path()),
    }
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<dto::ListInventoryQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text(), uri.path());
        }
    };

    match services.inventory().list(query.status.as_deref()).await {
        Ok(records) => {
            let body: Vec<dto::InventoryResponse> =
                records.into_iter().map(dto::InventoryResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::inventory_error_to_response(e, uri.path()),
    }
}

pub async fn adjust_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(product_id): Path<String>,
    body: Result<Json<dto::AdjustInventoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e, uri.path()),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text(), uri.path());
        }
    };

    let cmd = match body.into_command(product_id) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e, uri.path()),
    };

    match services.inventory().adjust(cmd).await {
        Ok(rec) => (StatusCode::OK, Json(dto::InventoryResponse::from(rec))).into_response(),
        Err(e) => errors::inventory_error_to_response(e, uri.path()),
    }
}

pub async fn delete_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e, uri.path()),
    };

    match services.inventory().delete(product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::inventory_error_to_response(e, uri.path()),
    }
}
