//! Repository Fetcher
//!
//! Cache-aside retrieval of the repository listing: read the cached payload,
//! fall back to upstream only on a genuine miss, repopulate the cache on a
//! best-effort basis, then parse and order the records.

mod metrics;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::KeyValueStore;
use crate::error::{FetchError, StoreError};
use crate::models::{parse_repositories, sort_by_forks, RepositoryRecord};
use crate::upstream::RepositorySource;

pub use metrics::{FetchMetrics, FetchStats};

/// Default key the upstream payload is cached under
pub const DEFAULT_CACHE_KEY: &str = "github";

/// Default lifetime of a populated cache entry, in seconds
pub const DEFAULT_CACHE_TTL: u64 = 60 * 60;

/// Cache placement of the upstream payload.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub cache_key: String,
    pub cache_ttl: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

// == Repository Fetcher ==
/// Serves the repository listing from cache or upstream.
///
/// Holds no per-request state; a single instance is shared across requests.
pub struct RepositoryFetcher {
    store: Arc<dyn KeyValueStore>,
    source: Arc<dyn RepositorySource>,
    settings: FetchSettings,
    metrics: FetchMetrics,
}

impl RepositoryFetcher {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn RepositorySource>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            store,
            source,
            settings,
            metrics: FetchMetrics::new(),
        }
    }

    /// Counters describing past fetches.
    pub fn metrics(&self) -> &FetchMetrics {
        &self.metrics
    }

    /// Returns all repositories ordered by forks, highest first.
    ///
    /// Only a cache miss falls through to upstream. Any other cache read
    /// error fails the call without contacting upstream. A failed cache
    /// write after a successful upstream fetch is logged and ignored.
    pub async fn get(&self) -> Result<Vec<RepositoryRecord>, FetchError> {
        let result = self.fetch_sorted().await;
        if result.is_err() {
            self.metrics.record_failure();
        }
        result
    }

    async fn fetch_sorted(&self) -> Result<Vec<RepositoryRecord>, FetchError> {
        let payload = self.load_payload().await?;
        let mut repos = parse_repositories(&payload)?;
        sort_by_forks(&mut repos);
        Ok(repos)
    }

    async fn load_payload(&self) -> Result<Vec<u8>, FetchError> {
        let key = self.settings.cache_key.as_str();

        match self.store.get(key).await {
            Ok(payload) => {
                self.metrics.record_hit();
                debug!(key, bytes = payload.len(), "Cache hit");
                Ok(payload)
            }
            Err(StoreError::NotFound(_)) => {
                self.metrics.record_miss();
                debug!(key, "Cache miss");
                self.refresh(key).await
            }
            Err(err) => Err(FetchError::CacheUnavailable(err)),
        }
    }

    async fn refresh(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        self.metrics.record_upstream_call();
        let payload = self.source.fetch().await?;
        info!(
            url = self.source.url(),
            bytes = payload.len(),
            "Fetched repositories from upstream"
        );

        if let Err(err) = self
            .store
            .set(key, &payload, Some(self.settings.cache_ttl))
            .await
        {
            self.metrics.record_cache_write_failure();
            warn!(key, error = %err, "Failed to populate cache, serving upstream payload");
        }

        Ok(payload)
    }
}
