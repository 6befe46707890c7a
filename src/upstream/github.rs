//! GitHub REST client for an account's public repository listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use tracing::{debug, info};

use crate::error::FetchError;
use crate::upstream::RepositorySource;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Lists `<api_url>/users/<account>/repos` with a single unauthenticated GET.
pub struct GitHubSource {
    client: Client,
    url: String,
}

impl GitHubSource {
    /// Creates a source for `account`, using `api_url` or the public API.
    #[tracing::instrument(skip(api_url))]
    pub fn new(
        account: &str,
        api_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo_cache/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::UpstreamUnavailable(format!("HTTP client error: {}", e)))?;

        Ok(Self::with_client(client, account, api_url))
    }

    /// Creates a source around an existing client.
    pub fn with_client(client: Client, account: &str, api_url: Option<&str>) -> Self {
        let api_url = api_url.unwrap_or(DEFAULT_API_URL).trim_end_matches('/');
        Self {
            client,
            url: format!("{}/users/{}/repos", api_url, account),
        }
    }
}

#[async_trait]
impl RepositorySource for GitHubSource {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        info!("Fetching repositories from upstream");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            FetchError::UpstreamUnavailable(format!("Failed to send request: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "Upstream responded with {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            FetchError::UpstreamUnavailable(format!("Failed to read response body: {}", e))
        })?;

        debug!(bytes = body.len(), "Upstream response received");
        Ok(body.to_vec())
    }

    fn url(&self) -> &str {
        &self.url
    }
}
