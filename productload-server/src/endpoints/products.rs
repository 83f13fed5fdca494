use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing};
use productload_engine::Resource;

use crate::endpoints::common::{ApiError, ApiResult};
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/product", routing::get(product_list).post(product_create))
        .route("/product/{id}", routing::get(product_get))
}

async fn product_list(State(store): State<ServiceState>) -> Json<Vec<Resource>> {
    Json(store.list())
}

async fn product_get(
    State(store): State<ServiceState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Resource>> {
    store.get(&id).map(Json).ok_or(ApiError::NotFound(id))
}

async fn product_create(
    State(store): State<ServiceState>,
    payload: Result<Json<Resource>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(product) = payload.map_err(|rejection| ApiError::Client(rejection.body_text()))?;
    if product.id.is_empty() {
        return Err(ApiError::Client("product id must not be empty".to_owned()));
    }

    tracing::trace!(id = %product.id, "storing product");
    store.insert(product);
    Ok(StatusCode::CREATED)
}
