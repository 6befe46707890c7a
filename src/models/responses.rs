//! Response DTOs for the repository cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::fetcher::FetchStats;

/// Response body for the direct cache write (GET /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            message: "Set correctly".to_string(),
            key: key.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Fetches served from the cache
    pub cache_hits: u64,
    /// Fetches that found no cache entry
    pub cache_misses: u64,
    /// Requests sent to the upstream API
    pub upstream_calls: u64,
    /// Cache populations that failed and were skipped
    pub cache_write_failures: u64,
    /// Fetches that returned an error
    pub failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<FetchStats> for StatsResponse {
    fn from(stats: FetchStats) -> Self {
        Self {
            cache_hits: stats.cache_hits,
            cache_misses: stats.cache_misses,
            upstream_calls: stats.upstream_calls,
            cache_write_failures: stats.cache_write_failures,
            failures: stats.failures,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
