//! Cache Entry Module
//!
//! The envelope stored in the backend: the cached value plus write metadata.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{Ttl, MAX_TTL_MINUTES};
use crate::error::{BackendError, BackendResult};

// == Cache Entry ==
/// A cached value wrapped with its write metadata.
///
/// `expires_at` is informational; the backend enforces expiry on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// Fully-qualified cache key
    pub key: String,
    /// The cached payload
    pub value: T,
    /// When the entry was written
    pub cached_at: DateTime<Utc>,
    /// When the backend will drop the entry
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Wraps `value` with `cached_at = now` and `expires_at = now + ttl`.
    pub fn new(key: impl Into<String>, value: T, ttl: Ttl) -> Self {
        let cached_at = Utc::now();
        let minutes = ttl.minutes().min(MAX_TTL_MINUTES) as i64;
        let expires_at = cached_at + ChronoDuration::minutes(minutes);

        Self {
            key: key.into(),
            value,
            cached_at,
            expires_at,
        }
    }

    /// Remaining lifetime according to the envelope metadata, zero once past.
    pub fn ttl_remaining(&self) -> std::time::Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}

impl<T: Serialize> CacheEntry<T> {
    /// Encodes the envelope as JSON bytes.
    pub fn encode(&self) -> BackendResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<T: DeserializeOwned> CacheEntry<T> {
    // == Decode ==
    /// Decodes an envelope.
    ///
    /// Returns `Ok(None)` for a well-formed JSON document that is not an
    /// envelope (no `value` field); decoding errors are reported as
    /// [`BackendError::Codec`].
    pub fn decode(bytes: &[u8]) -> BackendResult<Option<Self>> {
        let raw: Value = serde_json::from_slice(bytes)?;
        let has_value = raw
            .as_object()
            .is_some_and(|fields| fields.contains_key("value"));
        if !has_value {
            return Ok(None);
        }
        serde_json::from_value(raw)
            .map(Some)
            .map_err(BackendError::from)
    }
}
