//! Backend Module
//!
//! The key-value store contract the cache facade is layered over, plus the
//! in-memory implementation used by the server binary and the tests.

mod counters;
mod memory;
mod recency;

use std::time::Duration;

use serde::Serialize;

use crate::error::{BackendError, BackendResult};

pub use counters::BackendCounters;
pub use memory::{MemoryBackend, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
pub use recency::RecencyIndex;

// == Backend Info ==
/// Telemetry snapshot exposed by backends that track their own usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendInfo {
    /// Number of live entries
    pub total_entries: usize,
    /// Approximate bytes held by keys and values
    pub used_memory_bytes: usize,
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to stay under capacity
    pub evictions: u64,
}

// == Cache Backend Trait ==
/// Minimal key-value contract required by [`crate::cache::CacheFacade`].
///
/// Any store honouring per-key TTLs satisfies it: an in-process map, Redis,
/// Memcached. Pattern scans and telemetry are optional; the defaults report
/// them as unsupported and the facade degrades accordingly (flush instead of
/// selective deletion, minimal stats).
pub trait CacheBackend: Send + Sync {
    /// Short driver name used in diagnostics.
    fn driver(&self) -> &str;

    /// Reads the raw bytes stored under `key`, `None` if absent or expired.
    fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, expiring after `ttl`.
    ///
    /// Returns `Ok(false)` if the backend declined the write.
    fn put(&self, key: &str, bytes: Vec<u8>, ttl: Duration) -> BackendResult<bool>;

    /// Whether `key` holds a live entry.
    ///
    /// Backends that track hit/miss telemetry should override this so that
    /// existence checks do not count as reads.
    fn contains(&self, key: &str) -> BackendResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Removes `key`. Returns whether an entry was removed.
    fn delete(&self, key: &str) -> BackendResult<bool>;

    /// Removes every entry.
    fn flush_all(&self) -> BackendResult<bool>;

    /// Whether [`CacheBackend::keys_matching`] is available.
    fn supports_key_scan(&self) -> bool {
        false
    }

    /// Lists live keys containing `pattern`.
    fn keys_matching(&self, _pattern: &str) -> BackendResult<Vec<String>> {
        Err(BackendError::Unsupported("key scan"))
    }

    /// Returns usage telemetry.
    fn info(&self) -> BackendResult<BackendInfo> {
        Err(BackendError::Unsupported("info"))
    }
}
