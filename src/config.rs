//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

const DEFAULT_REDIS_PORT: u16 = 6379;

/// Which key-value store backs the repository cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Network Redis server
    Redis,
    /// In-process store, lost on restart
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache backend selection
    pub cache_backend: CacheBackend,
    /// Redis host:port
    pub redis_addr: String,
    /// Redis password, empty for none
    pub redis_password: String,
    /// Redis logical database index
    pub redis_db: i64,
    /// Key the upstream payload is cached under
    pub cache_key: String,
    /// TTL in seconds for populated cache entries
    pub cache_ttl: u64,
    /// Per-operation store timeout in seconds
    pub cache_timeout: u64,
    /// Account whose repositories are listed
    pub github_account: String,
    /// Base URL of the repository API
    pub github_api_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// Expiry sweep interval in seconds for the in-memory backend
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_ADDR` - Redis host:port (default: 127.0.0.1:6379)
    /// - `REDIS_PASSWORD` - Redis password (default: empty)
    /// - `REDIS_DB` - Redis database index (default: 0)
    /// - `CACHE_KEY` - Cache key (default: github)
    /// - `CACHE_TTL` - Cache TTL in seconds, must be positive (default: 3600)
    /// - `CACHE_TIMEOUT` - Store operation timeout in seconds (default: 2)
    /// - `GITHUB_ACCOUNT` - Account to list (default: laurencejjones)
    /// - `GITHUB_API_URL` - API base URL (default: https://api.github.com)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Memory backend sweep frequency in seconds (default: 60)
    ///
    /// Durations of zero are ignored in favour of the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            redis_addr: env::var("REDIS_ADDR").unwrap_or(defaults.redis_addr),
            redis_password: env::var("REDIS_PASSWORD").unwrap_or(defaults.redis_password),
            redis_db: parse_var("REDIS_DB").unwrap_or(defaults.redis_db),
            cache_key: env::var("CACHE_KEY").unwrap_or(defaults.cache_key),
            cache_ttl: parse_seconds("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_timeout: parse_seconds("CACHE_TIMEOUT").unwrap_or(defaults.cache_timeout),
            github_account: env::var("GITHUB_ACCOUNT").unwrap_or(defaults.github_account),
            github_api_url: env::var("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            upstream_timeout: parse_seconds("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
            cleanup_interval: parse_seconds("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Connection parameters for the Redis backend.
    ///
    /// Built field by field so the password is passed through verbatim,
    /// whatever characters it contains.
    pub fn redis_connection_info(&self) -> Result<ConnectionInfo, String> {
        let (host, port) = split_host_port(&self.redis_addr)?;
        Ok(ConnectionInfo {
            addr: ConnectionAddr::Tcp(host, port),
            redis: RedisConnectionInfo {
                db: self.redis_db,
                password: (!self.redis_password.is_empty()).then(|| self.redis_password.clone()),
                ..Default::default()
            },
        })
    }
}

/// Splits `host[:port]`, accepting bracketed IPv6 hosts.
fn split_host_port(addr: &str) -> Result<(String, u16), String> {
    let addr = addr.trim();
    let (host, port) = match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') || host.ends_with(']') => {
            let port = port
                .parse()
                .map_err(|_| format!("invalid Redis port in '{}'", addr))?;
            (host, port)
        }
        _ => (addr, DEFAULT_REDIS_PORT),
    };

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(format!("missing Redis host in '{}'", addr));
    }
    Ok((host.to_string(), port))
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn parse_seconds(name: &str) -> Option<u64> {
    env::var(name).ok().as_deref().and_then(nonzero_seconds)
}

fn nonzero_seconds(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|&secs| secs > 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_backend: CacheBackend::Redis,
            redis_addr: "127.0.0.1:6379".to_string(),
            redis_password: String::new(),
            redis_db: 0,
            cache_key: "github".to_string(),
            cache_ttl: 3600,
            cache_timeout: 2,
            github_account: "laurencejjones".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            upstream_timeout: 10,
            cleanup_interval: 60,
        }
    }
}
