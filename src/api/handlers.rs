//! API Handlers
//!
//! HTTP request handlers for each service endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::info;

use crate::cache::KeyValueStore;
use crate::error::{ApiError, Result};
use crate::fetcher::{FetchSettings, RepositoryFetcher};
use crate::models::{HealthResponse, RepositoryRecord, SetQuery, SetResponse, StatsResponse};
use crate::upstream::RepositorySource;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside repository fetcher
    pub fetcher: Arc<RepositoryFetcher>,
    /// Store backing the fetcher, used directly by `/set`
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Creates a new AppState wiring the fetcher to the given collaborators.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn RepositorySource>,
        settings: FetchSettings,
    ) -> Self {
        let fetcher = RepositoryFetcher::new(store.clone(), source, settings);
        Self {
            fetcher: Arc::new(fetcher),
            store,
        }
    }
}

/// Handler for GET /github
///
/// Returns the repository listing sorted by forks descending.
pub async fn github_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<RepositoryRecord>>> {
    let repos = state.fetcher.get().await?;
    Ok(Json(repos))
}

/// Handler for GET /set
///
/// Stores a value under an arbitrary key with an optional expiration.
pub async fn set_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SetQuery>, QueryRejection>,
) -> Result<Json<SetResponse>> {
    let Query(req) = query.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    info!(key = %req.key, exp = req.exp, "Direct cache write");
    state
        .store
        .set(&req.key, req.value.as_bytes(), req.ttl())
        .await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /stats
///
/// Returns current fetcher statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.fetcher.metrics().snapshot().into())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
