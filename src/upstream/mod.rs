//! Upstream Module
//!
//! Access to the repository-hosting API that is the source of truth.

mod github;

use async_trait::async_trait;

use crate::error::FetchError;

pub use github::{GitHubSource, DEFAULT_API_URL};

// == Repository Source Trait ==
/// Supplies the raw repository listing payload.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Performs one request for the listing and returns the response body.
    ///
    /// Transport failures and non-success statuses are reported as
    /// [`FetchError::UpstreamUnavailable`]. The body is not validated.
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;

    /// URL the listing is requested from.
    fn url(&self) -> &str;
}
