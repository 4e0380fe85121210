//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
    /// RFC 3339 write time
    pub cached_at: String,
    /// RFC 3339 expiry time
    pub expires_at: String,
    /// Seconds until `expires_at`, zero once past
    pub ttl_remaining_secs: u64,
}

/// Response body for POST /keys/generate
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    pub key: String,
}

impl KeyResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Outcome of a single-target operation (put, forget, refresh, flush...)
#[derive(Debug, Clone, Serialize)]
pub struct OperationResponse {
    /// What was targeted: a key, pattern, module or `*`
    pub target: String,
    /// Whether the backend reported success
    pub success: bool,
    pub message: String,
}

impl OperationResponse {
    pub fn new(target: impl Into<String>, success: bool, action: &str) -> Self {
        let target = target.into();
        let message = if success {
            format!("{} '{}' succeeded", action, target)
        } else {
            format!("{} '{}' had no effect", action, target)
        };
        Self {
            target,
            success,
            message,
        }
    }
}

/// Response body for POST /invalidate/keys
#[derive(Debug, Clone, Serialize)]
pub struct ForgetManyResponse {
    pub results: BTreeMap<String, bool>,
    /// Number of keys actually removed
    pub removed: usize,
}

impl ForgetManyResponse {
    pub fn new(results: BTreeMap<String, bool>) -> Self {
        let removed = results.values().filter(|removed| **removed).count();
        Self { results, removed }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active backend driver
    pub driver: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(driver: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            driver: driver.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
