//! Repo Cache - A cache-aside proxy for an account's GitHub repositories
//!
//! Serves the repository listing sorted by forks, caching the raw upstream
//! payload in Redis (or in memory) with a TTL.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::{signal, task::JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repo_cache::{
    api::create_router,
    cache::{KeyValueStore, MemoryStore, RedisStore, RedisStoreConfig},
    config::CacheBackend,
    fetcher::FetchSettings,
    spawn_cleanup_task,
    upstream::{GitHubSource, RepositorySource},
    AppState, Config,
};

/// Main entry point for the repository cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache store and the upstream client
/// 4. Start background TTL cleanup for the in-memory backend
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting repository cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, cache_key={}, cache_ttl={}s, account={}, port={}",
        config.cache_backend,
        config.cache_key,
        config.cache_ttl,
        config.github_account,
        config.server_port
    );

    let (store, cleanup_handle) = build_store(&config)?;

    let source = GitHubSource::new(
        &config.github_account,
        Some(config.github_api_url.as_str()),
        Duration::from_secs(config.upstream_timeout),
    )
    .context("Failed to build upstream client")?;
    info!("Upstream endpoint: {}", source.url());

    let settings = FetchSettings {
        cache_key: config.cache_key.clone(),
        cache_ttl: config.cache_ttl,
    };
    let state = AppState::new(store, Arc::new(source), settings);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Creates the configured store, plus the sweep task for the in-memory backend.
fn build_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn KeyValueStore>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackend::Redis => {
            let connection = config
                .redis_connection_info()
                .map_err(anyhow::Error::msg)
                .context("Invalid REDIS_ADDR")?;
            let store = RedisStore::new(RedisStoreConfig {
                connection,
                operation_timeout: Duration::from_secs(config.cache_timeout),
            })
            .context("Failed to configure Redis store")?;
            info!("Redis store configured at {}", config.redis_addr);
            let store: Arc<dyn KeyValueStore> = Arc::new(store);
            Ok((store, None))
        }
        CacheBackend::Memory => {
            let memory = Arc::new(MemoryStore::new());
            let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            info!("In-memory store initialized with background cleanup");
            let store: Arc<dyn KeyValueStore> = memory;
            Ok((store, Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
