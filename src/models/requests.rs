//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::backend::MAX_KEY_LENGTH;
use crate::cache::Ttl;

/// Request body for PUT /keys
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The cache key
    pub key: String,
    /// Arbitrary JSON payload
    pub value: Value,
    /// Tier name or minute count (default: medium)
    #[serde(default)]
    pub ttl: Option<Ttl>,
}

impl PutRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for POST /keys/generate
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateKeyRequest {
    pub module: String,
    pub identifier: String,
    /// Filter or pagination params fingerprinted into the key
    #[serde(default)]
    pub params: Value,
}

impl GenerateKeyRequest {
    pub fn validate(&self) -> Option<String> {
        if self.module.trim().is_empty() {
            return Some("Module cannot be empty".to_string());
        }
        if self.identifier.trim().is_empty() {
            return Some("Identifier cannot be empty".to_string());
        }
        None
    }
}

/// Optional body for POST /keys/:key/refresh
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub ttl: Option<Ttl>,
}

/// Request body for POST /invalidate/keys
#[derive(Debug, Clone, Deserialize)]
pub struct ForgetManyRequest {
    pub keys: Vec<String>,
}

impl ForgetManyRequest {
    pub fn validate(&self) -> Option<String> {
        if self.keys.is_empty() {
            return Some("At least one key is required".to_string());
        }
        self.keys.iter().find_map(|key| validate_key(key))
    }
}

/// Request body for POST /invalidate/pattern
#[derive(Debug, Clone, Deserialize)]
pub struct PatternRequest {
    pub pattern: String,
}

impl PatternRequest {
    /// An empty pattern would match every key; callers must use /flush.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        ));
    }
    None
}
