//! Repository records as returned by the upstream API
//!
//! Parsing is lenient about absent and `null` fields and strict about structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// License metadata. All fields are empty when a repository is unlicensed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLicense {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spdx_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// One upstream repository's metadata.
///
/// Field names on the wire follow the GitHub REST API. Unknown fields are
/// ignored; missing or `null` fields take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "html_url", default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forks: u64,
    #[serde(
        rename = "stargazers_count",
        default,
        deserialize_with = "null_as_default"
    )]
    pub stars: u64,
    #[serde(rename = "watchers_count", default, deserialize_with = "null_as_default")]
    pub watchers: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub license: RepositoryLicense,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a raw payload into repository records.
///
/// The payload must be a JSON array; anything else is rejected as a whole.
pub fn parse_repositories(payload: &[u8]) -> Result<Vec<RepositoryRecord>, serde_json::Error> {
    serde_json::from_slice(payload)
}

/// Orders repositories by forks, highest first. Equal fork counts keep
/// their relative order.
pub fn sort_by_forks(repos: &mut [RepositoryRecord]) {
    // slice::sort_by is stable
    repos.sort_by(|a, b| b.forks.cmp(&a.forks));
}
