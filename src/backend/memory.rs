//! Memory Backend Module
//!
//! In-process key-value store with per-entry TTL, LRU capacity eviction and
//! optional key scanning.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{BackendCounters, BackendInfo, CacheBackend, RecencyIndex};
use crate::error::{BackendError, BackendResult};

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum accepted payload size in bytes
pub const MAX_VALUE_SIZE: usize = 8 * 1024 * 1024; // 8 MB

/// Longest retention applied to a single entry (100 years)
const MAX_RETENTION: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug)]
struct Slot {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
struct Inner {
    slots: HashMap<String, Slot>,
    recency: RecencyIndex,
    counters: BackendCounters,
    used_bytes: usize,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        match self.slots.remove(key) {
            Some(slot) => {
                self.recency.remove(key);
                self.used_bytes -= key.len() + slot.bytes.len();
                true
            }
            None => false,
        }
    }
}

// == Memory Backend ==
/// Thread-safe in-memory [`CacheBackend`].
#[derive(Debug)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    max_entries: usize,
    key_scan: bool,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates a backend holding at most `max_entries` live entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                slots: HashMap::new(),
                recency: RecencyIndex::new(),
                counters: BackendCounters::new(),
                used_bytes: 0,
            }),
            max_entries: max_entries.max(1),
            key_scan: true,
        }
    }

    /// Disables pattern scanning, turning selective invalidation on the
    /// facade into a full flush.
    pub fn without_key_scan(mut self) -> Self {
        self.key_scan = false;
        self
    }

    /// Creates a backend from the server configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let backend = Self::new(config.max_entries);
        if config.key_scan {
            backend
        } else {
            backend.without_key_scan()
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&self) -> BackendResult<usize> {
        let mut inner = self.inner.lock()?;
        let now = Instant::now();
        let expired: Vec<String> = inner
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        Ok(expired.len())
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> BackendResult<usize> {
        Ok(self.inner.lock()?.slots.len())
    }

    pub fn is_empty(&self) -> BackendResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl CacheBackend for MemoryBackend {
    fn driver(&self) -> &str {
        "memory"
    }

    // == Get ==
    /// Expired entries are removed on read and counted as misses.
    fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>> {
        let mut inner = self.inner.lock()?;
        let now = Instant::now();

        let live = match inner.slots.get(key) {
            Some(slot) if !slot.is_expired(now) => Some(slot.bytes.clone()),
            Some(_) => {
                inner.remove(key);
                None
            }
            None => None,
        };

        match live {
            Some(bytes) => {
                inner.counters.record_hit();
                inner.recency.touch(key);
                Ok(Some(bytes))
            }
            None => {
                inner.counters.record_miss();
                Ok(None)
            }
        }
    }

    // == Put ==
    /// Overwrites reset the TTL. At capacity, the least recently used entry
    /// is evicted first. TTLs beyond `MAX_RETENTION` are clamped.
    fn put(&self, key: &str, bytes: Vec<u8>, ttl: Duration) -> BackendResult<bool> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            warn!(key_len = key.len(), "Rejected write: invalid key length");
            return Ok(false);
        }
        if bytes.len() > MAX_VALUE_SIZE {
            warn!(key, size = bytes.len(), "Rejected write: value too large");
            return Ok(false);
        }
        let Some(expires_at) = Instant::now().checked_add(ttl.min(MAX_RETENTION)) else {
            warn!(key, ?ttl, "Rejected write: expiry out of range");
            return Ok(false);
        };

        let mut inner = self.inner.lock()?;
        let replaced = inner.remove(key);

        if !replaced && inner.slots.len() >= self.max_entries {
            match inner.recency.pop_oldest() {
                Some(evicted) => {
                    inner.remove(&evicted);
                    inner.counters.record_eviction();
                    debug!(key = %evicted, "Evicted least recently used entry");
                }
                None => return Ok(false),
            }
        }

        inner.used_bytes += key.len() + bytes.len();
        inner.slots.insert(
            key.to_string(),
            Slot { bytes, expires_at },
        );
        inner.recency.touch(key);
        Ok(true)
    }

    /// Leaves counters and recency untouched.
    fn contains(&self, key: &str) -> BackendResult<bool> {
        let inner = self.inner.lock()?;
        let now = Instant::now();
        Ok(inner.slots.get(key).is_some_and(|slot| !slot.is_expired(now)))
    }

    fn delete(&self, key: &str) -> BackendResult<bool> {
        Ok(self.inner.lock()?.remove(key))
    }

    fn flush_all(&self) -> BackendResult<bool> {
        let mut inner = self.inner.lock()?;
        inner.slots.clear();
        inner.recency.clear();
        inner.counters.reset();
        inner.used_bytes = 0;
        Ok(true)
    }

    fn supports_key_scan(&self) -> bool {
        self.key_scan
    }

    fn keys_matching(&self, pattern: &str) -> BackendResult<Vec<String>> {
        if !self.key_scan {
            return Err(BackendError::Unsupported("key scan"));
        }
        let inner = self.inner.lock()?;
        let now = Instant::now();
        let mut keys: Vec<String> = inner
            .slots
            .iter()
            .filter(|(key, slot)| !slot.is_expired(now) && key.contains(pattern))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn info(&self) -> BackendResult<BackendInfo> {
        let inner = self.inner.lock()?;
        Ok(BackendInfo {
            total_entries: inner.slots.len(),
            used_memory_bytes: inner.used_bytes,
            hits: inner.counters.hits,
            misses: inner.counters.misses,
            evictions: inner.counters.evictions,
        })
    }
}
