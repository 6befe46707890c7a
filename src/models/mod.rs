//! Data models for the repository cache service
//!
//! Repository records parsed from the upstream payload, plus the DTOs used
//! for serializing/deserializing HTTP request and response bodies.

pub mod repository;
pub mod requests;
pub mod responses;


// Re-export commonly used types
pub use repository::{parse_repositories, sort_by_forks, RepositoryLicense, RepositoryRecord};
pub use requests::SetQuery;
pub use responses::{ErrorResponse, HealthResponse, SetResponse, StatsResponse};
