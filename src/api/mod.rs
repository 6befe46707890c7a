//! API Module
//!
//! HTTP handlers and routing for the repository cache service.
//!
//! # Endpoints
//! - `GET /github` - Repositories sorted by forks, highest first
//! - `GET /set` - Write a value directly to the cache
//! - `GET /stats` - Fetcher statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
