use axum::{Router, routing::get};

pub mod skus;
pub mod system;

/// Router for every endpoint (no authentication layer).
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/skus", skus::router())
}
