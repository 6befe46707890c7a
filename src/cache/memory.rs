//! In-Memory Store Module
//!
//! HashMap-backed key-value store with TTL expiration. Expired entries are
//! removed lazily on read and in bulk by the background cleanup task.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, KeyValueStore};
use crate::error::StoreError;

// == Memory Store ==
/// Process-local key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Remaining TTL ==
    /// Returns the remaining TTL in seconds of a live entry.
    ///
    /// `None` if the key is absent, expired or stored without expiration.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(CacheEntry::ttl_remaining)
    }

    // == Length ==
    /// Returns the current number of entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        // Write lock so an expired entry can be dropped in place
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Err(StoreError::NotFound(key.to_string()))
            }
            Some(entry) => Ok(entry.value.clone()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<u64>) -> Result<(), StoreError> {
        let entry = CacheEntry::new(value.to_vec(), ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}
