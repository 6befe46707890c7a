//! Redis Store Module
//!
//! Redis-backed key-value store. Payloads are stored verbatim as binary
//! strings; TTLs use SETEX so Redis expires entries on its own.

use std::future::Future;
use std::time::Duration;

use ::redis::{
    aio::ConnectionManager, AsyncCommands, Client, ConnectionAddr, ConnectionInfo,
    RedisConnectionInfo,
};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::cache::KeyValueStore;
use crate::error::StoreError;

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Server address, database and credentials
    pub connection: ConnectionInfo,
    /// Upper bound for connecting plus one command
    pub operation_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionInfo {
                addr: ConnectionAddr::Tcp("127.0.0.1".to_string(), 6379),
                redis: RedisConnectionInfo::default(),
            },
            operation_timeout: Duration::from_secs(2),
        }
    }
}

/// Redis-backed key-value store.
///
/// Holds one shared connection manager, opened on first use and cloned
/// for each operation. The manager reconnects on its own after the server
/// drops the link.
pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    config: RedisStoreConfig,
}

impl RedisStore {
    /// Creates a store for the configured server.
    ///
    /// No connection is made until first use, so the server may start
    /// before Redis is reachable.
    pub fn new(config: RedisStoreConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.connection.clone())
            .map_err(|e| StoreError::Unavailable(format!("Redis client error: {}", e)))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            config,
        })
    }

    /// Returns a handle to the shared connection, connecting if needed.
    ///
    /// A failed connect leaves the cell empty and the next call tries again.
    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let manager = self.client.get_connection_manager().await.map_err(|e| {
                    StoreError::Unavailable(format!("Redis connection error: {}", e))
                })?;
                info!("Redis connection established");
                Ok::<_, StoreError>(manager)
            })
            .await?;

        Ok(manager.clone())
    }

    async fn with_timeout<T, F>(&self, op: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.config.operation_timeout, fut)
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "Redis {} timed out after {:?}",
                    op, self.config.operation_timeout
                ))
            })?
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.with_timeout("GET", async {
            let mut conn = self.connection().await?;
            let value: Option<Vec<u8>> = conn
                .get(key)
                .await
                .map_err(|e| StoreError::Unavailable(format!("Redis GET error: {}", e)))?;

            debug!(key, found = value.is_some(), "Redis GET");
            value.ok_or_else(|| StoreError::NotFound(key.to_string()))
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<u64>) -> Result<(), StoreError> {
        self.with_timeout("SET", async {
            let mut conn = self.connection().await?;

            match ttl {
                Some(seconds) => {
                    let _: () = conn.set_ex(key, value, seconds).await.map_err(|e| {
                        StoreError::Unavailable(format!("Redis SETEX error: {}", e))
                    })?;
                }
                None => {
                    let _: () = conn
                        .set(key, value)
                        .await
                        .map_err(|e| StoreError::Unavailable(format!("Redis SET error: {}", e)))?;
                }
            }

            debug!(key, bytes = value.len(), ttl = ?ttl, "Redis SET");
            Ok(())
        })
        .await
    }
}
