//! Request DTOs for the repository cache API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Query parameters for the direct cache write (GET /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
/// - `exp`: Expiration in seconds, 0 or absent for no expiration
#[derive(Debug, Clone, Deserialize)]
pub struct SetQuery {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional expiration in seconds
    #[serde(default)]
    pub exp: u64,
}

impl SetQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.is_empty() {
            return Some("Value cannot be empty".to_string());
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }

    /// Expiration as an optional TTL, `None` meaning the entry never expires.
    pub fn ttl(&self) -> Option<u64> {
        (self.exp > 0).then_some(self.exp)
    }
}
