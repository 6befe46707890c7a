//! Cache Module
//!
//! Key-value store abstraction used by the repository fetcher, with a Redis
//! backend for production and an in-memory backend with TTL expiration.

mod entry;
mod memory;
mod redis_store;


use async_trait::async_trait;

use crate::error::StoreError;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use redis_store::{RedisStore, RedisStoreConfig};

// == Key-Value Store Trait ==
/// Byte-oriented key-value store with per-entry expiration.
///
/// `get` must report an absent or expired key as [`StoreError::NotFound`] and
/// every other failure as [`StoreError::Unavailable`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// `ttl` is in seconds; `None` stores the value without expiration.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<u64>) -> Result<(), StoreError>;
}
