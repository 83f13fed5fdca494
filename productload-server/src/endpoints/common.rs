//! Common types and utilities for API endpoints.

use std::error::Error;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested product does not exist.
    #[error("product `{0}` not found")]
    NotFound(String),

    /// Errors indicating malformed or illegal requests.
    #[error("client error: {0}")]
    Client(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// A JSON error response returned by the API.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    /// The main error message.
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorResponse {
    /// Creates an error response from an error.
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        Self {
            detail: Some(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(id) => {
                tracing::debug!(%id, "product not found");
                StatusCode::NOT_FOUND
            }
            ApiError::Client(msg) => {
                tracing::debug!("bad request: {msg}");
                StatusCode::BAD_REQUEST
            }
        };

        let body = ApiErrorResponse::from_error(&self);
        (status, Json(body)).into_response()
    }
}
