use axum::Router;

pub mod inventory;
pub mod system;

/// Router for all domain endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/inventory", inventory::router())
}
