//! Repo Cache - A cache-aside proxy for an account's GitHub repositories
//!
//! Serves the repository listing sorted by forks, caching the raw upstream
//! payload in Redis (or in memory) with a TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use fetcher::RepositoryFetcher;
pub use tasks::spawn_cleanup_task;
