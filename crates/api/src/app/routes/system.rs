use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::AppServices;

/// Liveness probe; `uptime` is in seconds.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "uptime": services.uptime().as_secs_f64(),
    }))
}
