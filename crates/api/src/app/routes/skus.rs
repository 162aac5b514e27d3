use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use skuflow_products::{CreateSku, SkuId, SkuPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_sku).get(list_skus))
        .route("/:id", get(get_sku).patch(update_sku).delete(delete_sku))
        .route("/:id/transition", post(transition_sku))
}

fn parse_id(raw: &str) -> Result<SkuId, axum::response::Response> {
    raw.parse().map_err(|_| errors::invalid_id())
}

pub async fn create_sku(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateSku>, JsonRejection>,
) -> axum::response::Response {
    let Json(input) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.skus.create(input).await {
        Ok(sku) => (StatusCode::CREATED, Json(sku)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_skus(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let params = match query.into_params() {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.skus.find_all(params).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.skus.find_one(id).await {
        Ok(sku) => (StatusCode::OK, Json(sku)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<SkuPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(patch) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.skus.update(id, patch).await {
        Ok(sku) => (StatusCode::OK, Json(sku)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn transition_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::TransitionRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(request) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.skus.transition(id, request.target).await {
        Ok(sku) => (StatusCode::OK, Json(sku)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.skus.remove(id).await {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
