//! Error types for the repository cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Errors reported by a key-value store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key is absent or expired. This is a cache miss, not a fault.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Connection, protocol or timeout failure talking to the store
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Fetch Error Enum ==
/// Failures surfaced by the repository fetcher.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Cache read failed for a reason other than a miss
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(#[source] StoreError),

    /// Upstream could not be reached or answered with a non-success status
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Payload is not a valid repository list
    #[error("Malformed repository payload: {0}")]
    UpstreamMalformed(#[from] serde_json::Error),
}

// == API Error Enum ==
/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Repository fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Direct store access failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Body returned for every fetch failure. Callers cannot tell the causes apart.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch repositories";

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Fetch(err) => {
                tracing::error!(error = %err, "Repository fetch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FETCH_FAILED_MESSAGE.to_string(),
                )
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Store write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to write to cache".to_string(),
                )
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
