use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use skuflow_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        ServiceError::NotFound(id) => {
            tracing::debug!(%id, "sku not found");
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        ServiceError::Conflict(code) => {
            tracing::debug!(sku = %code, "sku code already in use");
            json_error(StatusCode::CONFLICT, "conflict", message)
        }
        ServiceError::Validation(_) => rejected(StatusCode::BAD_REQUEST, "validation_error", message),
        ServiceError::EditNotAllowed { .. } => {
            rejected(StatusCode::BAD_REQUEST, "edit_not_allowed", message)
        }
        ServiceError::InvalidEdit => rejected(StatusCode::BAD_REQUEST, "invalid_edit", message),
        ServiceError::InvalidTransition { .. } => {
            rejected(StatusCode::BAD_REQUEST, "invalid_transition", message)
        }
        ServiceError::TerminalState => rejected(StatusCode::BAD_REQUEST, "terminal_state", message),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "record store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
        }
    }
}

fn rejected(status: StatusCode, code: &'static str, message: String) -> axum::response::Response {
    tracing::debug!(code, %message, "request rejected");
    json_error(status, code, message)
}

/// Malformed or mistyped JSON bodies (unknown fields and unknown status
/// values included) are client errors.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}

pub fn invalid_id() -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid sku id")
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
