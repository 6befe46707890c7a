//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle against a mocked upstream API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use repo_cache::{
    api::create_router,
    cache::{KeyValueStore, MemoryStore},
    error::StoreError,
    fetcher::FetchSettings,
    upstream::GitHubSource,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

const ACCOUNT: &str = "octocat";
const REPOS_PATH: &str = "/users/octocat/repos";
const TWO_REPOS: &str = r#"[
    {"name":"a","description":null,"html_url":"https://github.com/octocat/a","stargazers_count":1,"forks":2,"license":null},
    {"name":"b","description":"second","html_url":"https://github.com/octocat/b","forks":5,"language":"Rust",
     "license":{"key":"mit","name":"MIT License","spdx_id":"MIT","url":"https://api.github.com/licenses/mit"}}
]"#;

// == Helper Functions ==

fn create_app(server: &mockito::Server, store: Arc<dyn KeyValueStore>) -> Router {
    let url = server.url();
    let source = GitHubSource::new(ACCOUNT, Some(url.as_str()), Duration::from_secs(5)).unwrap();
    let state = AppState::new(store, Arc::new(source), FetchSettings::default());
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Store whose reads fail like a refused connection.
struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<u64>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Store that always misses and rejects writes.
struct ReadOnlyEmptyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyEmptyStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::NotFound(key.to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<u64>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("READONLY replica".to_string()))
    }
}

// == GITHUB Endpoint Tests ==

#[tokio::test]
async fn test_github_miss_fetches_sorts_and_caches() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", REPOS_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_REPOS)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(MemoryStore::new());
    let app = create_app(&server, store.clone());

    let response = app.oneshot(get("/github")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let repos = json.as_array().unwrap();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0]["name"], "b");
    assert_eq!(repos[0]["forks"], 5);
    assert_eq!(repos[0]["license"]["spdx_id"], "MIT");
    assert_eq!(repos[1]["name"], "a");
    assert_eq!(repos[1]["forks"], 2);
    assert_eq!(repos[1]["stargazers_count"], 1);
    assert_eq!(repos[1]["description"], "");
    assert_eq!(repos[1]["license"]["key"], "");

    mock.assert_async().await;

    // Raw payload cached verbatim with the hour-long TTL
    assert_eq!(store.get("github").await.unwrap(), TWO_REPOS.as_bytes());
    let ttl = store.ttl("github").await.unwrap();
    assert!(ttl > 3590 && ttl <= 3600);
}

#[tokio::test]
async fn test_github_hit_skips_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", REPOS_PATH)
        .with_status(200)
        .with_body(TWO_REPOS)
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryStore::new());
    store
        .set("github", br#"[{"name":"c","forks":1}]"#, Some(3600))
        .await
        .unwrap();
    let app = create_app(&server, store);

    let response = app.oneshot(get("/github")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "c");
    assert_eq!(json[0]["forks"], 1);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_github_repeated_calls_hit_upstream_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", REPOS_PATH)
        .with_status(200)
        .with_body(TWO_REPOS)
        .expect(1)
        .create_async()
        .await;

    let app = create_app(&server, Arc::new(MemoryStore::new()));

    let first = app.clone().oneshot(get("/github")).await.unwrap();
    let first = body_to_json(first.into_body()).await;
    let second = app.clone().oneshot(get("/github")).await.unwrap();
    let second = body_to_json(second.into_body()).await;

    assert_eq!(first, second);
    mock.assert_async().await;

    let stats = app.oneshot(get("/stats")).await.unwrap();
    let stats = body_to_json(stats.into_body()).await;
    assert_eq!(stats["cache_hits"], 1);
    assert_eq!(stats["cache_misses"], 1);
    assert_eq!(stats["upstream_calls"], 1);
}

#[tokio::test]
async fn test_github_cache_read_error_returns_500_without_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", REPOS_PATH)
        .with_status(200)
        .with_body(TWO_REPOS)
        .expect(0)
        .create_async()
        .await;

    let app = create_app(&server, Arc::new(UnreachableStore));

    let response = app.oneshot(get("/github")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_github_cache_write_error_still_serves() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", REPOS_PATH)
        .with_status(200)
        .with_body(TWO_REPOS)
        .expect(1)
        .create_async()
        .await;

    let app = create_app(&server, Arc::new(ReadOnlyEmptyStore));

    let response = app.clone().oneshot(get("/github")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json[0]["name"], "b");
    assert_eq!(json[1]["name"], "a");
    mock.assert_async().await;

    let stats = app.oneshot(get("/stats")).await.unwrap();
    let stats = body_to_json(stats.into_body()).await;
    assert_eq!(stats["cache_write_failures"], 1);
    assert_eq!(stats["failures"], 0);
}

#[tokio::test]
async fn test_github_upstream_error_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", REPOS_PATH)
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let store = Arc::new(MemoryStore::new());
    let app = create_app(&server, store.clone());

    let response = app.oneshot(get("/github")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    mock.assert_async().await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_github_malformed_payload_returns_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", REPOS_PATH)
        .with_status(200)
        .with_body(r#"[{"name":"a","forks":"lots"}]"#)
        .create_async()
        .await;

    let app = create_app(&server, Arc::new(MemoryStore::new()));

    let response = app.oneshot(get("/github")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Failed to fetch repositories");
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_overrides_cached_listing() {
    let server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryStore::new());
    let app = create_app(&server, store.clone());

    // Percent-encoded [{"name":"manual","forks":3}]
    let uri = "/set?key=github&value=%5B%7B%22name%22%3A%22manual%22%2C%22forks%22%3A3%7D%5D&exp=60";
    let response = app.clone().oneshot(get(uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Set correctly");
    assert_eq!(json["key"], "github");
    assert!(store.ttl("github").await.unwrap() <= 60);

    let response = app.oneshot(get("/github")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json[0]["name"], "manual");
}

#[tokio::test]
async fn test_set_endpoint_missing_key() {
    let server = mockito::Server::new_async().await;
    let app = create_app(&server, Arc::new(MemoryStore::new()));

    let response = app.oneshot(get("/set?value=hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_set_endpoint_store_failure() {
    let server = mockito::Server::new_async().await;
    let app = create_app(&server, Arc::new(UnreachableStore));

    let response = app.oneshot(get("/set?key=k&value=v")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let server = mockito::Server::new_async().await;
    let app = create_app(&server, Arc::new(MemoryStore::new()));

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
