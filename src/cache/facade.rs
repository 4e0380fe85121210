//! Cache Facade Module
//!
//! Read-through, tiered cache operations over a [`CacheBackend`].
//!
//! Every operation absorbs backend failures and returns a safe default: a
//! miss for reads, `false` for writes and invalidations, and a direct call
//! to the compute closure for [`CacheFacade::remember`]. Failures are logged,
//! never returned.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::backend::CacheBackend;
use crate::cache::{CacheEntry, KeyGenerator, ModulePrefixes, StatsSnapshot, Ttl};
use crate::error::{BackendError, BackendResult};

// == Cache Facade ==
/// Stateless cache service. Cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct CacheFacade {
    backend: Arc<dyn CacheBackend>,
    keys: KeyGenerator,
}

impl fmt::Debug for CacheFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFacade")
            .field("driver", &self.backend.driver())
            .field("keys", &self.keys)
            .finish()
    }
}

impl CacheFacade {
    // == Constructors ==
    /// Creates a facade with the built-in module prefix table.
    pub fn new(backend: Arc<dyn CacheBackend>, namespace: impl Into<String>) -> Self {
        Self::with_prefixes(backend, namespace, ModulePrefixes::default())
    }

    pub fn with_prefixes(
        backend: Arc<dyn CacheBackend>,
        namespace: impl Into<String>,
        prefixes: ModulePrefixes,
    ) -> Self {
        Self {
            backend,
            keys: KeyGenerator::new(namespace, prefixes),
        }
    }

    pub fn key_generator(&self) -> &KeyGenerator {
        &self.keys
    }

    pub fn driver(&self) -> &str {
        self.backend.driver()
    }

    // == Generate Key ==
    /// See [`KeyGenerator::generate`].
    pub fn generate_key<P: Serialize + ?Sized>(
        &self,
        module: &str,
        identifier: &str,
        params: &P,
    ) -> String {
        self.keys.generate(module, identifier, params)
    }

    // == Get ==
    /// Returns the cached value for `key`.
    ///
    /// `None` means absent, expired, malformed or unreadable. A stored JSON
    /// `null` read as `Option<_>` is a hit: `Some(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read_entry::<T>(key) {
            Ok(Some(entry)) => {
                debug!(key, "Cache hit");
                Some(entry.value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(err) => {
                warn!(key, error = %err, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Returns the cached value for `key`, or `default` on a miss.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Reads the whole envelope, metadata included.
    pub fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        self.read_entry(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "Cache read failed, treating as miss");
            None
        })
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> BackendResult<Option<CacheEntry<T>>> {
        match self.backend.get(key)? {
            Some(bytes) => CacheEntry::decode(&bytes),
            None => Ok(None),
        }
    }

    // == Put ==
    /// Stores `value` under `key` for `ttl`. Returns whether the write landed.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: impl Into<Ttl>) -> bool {
        let ttl = ttl.into();
        match self.write_entry(key, value, ttl) {
            Ok(stored) => {
                debug!(key, %ttl, stored, "Cache write");
                stored
            }
            Err(err) => {
                warn!(key, error = %err, "Cache write failed");
                false
            }
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, value: &T, ttl: Ttl) -> BackendResult<bool> {
        let bytes = CacheEntry::new(key, value, ttl).encode()?;
        self.backend.put(key, bytes, ttl.as_duration())
    }

    // == Remember ==
    /// Returns the cached value for `key`, or computes, stores and returns it.
    ///
    /// `compute` runs only on a miss and at most once per call. Its result is
    /// returned even when storing it fails.
    pub fn remember<T, F>(&self, key: &str, compute: F, ttl: impl Into<Ttl>) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.get(key) {
            return cached;
        }
        let value = compute();
        self.put(key, &value, ttl);
        value
    }

    /// Fallible variant of [`CacheFacade::remember`].
    ///
    /// An `Err` from `compute` is returned as-is and nothing is stored.
    pub fn try_remember<T, E, F>(&self, key: &str, compute: F, ttl: impl Into<Ttl>) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }
        let value = compute()?;
        self.put(key, &value, ttl);
        Ok(value)
    }

    // == Forget ==
    /// Deletes `key`. Returns `false` if nothing was removed or on failure.
    pub fn forget(&self, key: &str) -> bool {
        match self.backend.delete(key) {
            Ok(removed) => {
                debug!(key, removed, "Cache forget");
                removed
            }
            Err(err) => {
                warn!(key, error = %err, "Cache forget failed");
                false
            }
        }
    }

    /// Deletes each key independently and reports the outcome per key.
    pub fn forget_many<I, K>(&self, keys: I) -> BTreeMap<String, bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), self.forget(key))
            })
            .collect()
    }

    // == Forget By Pattern ==
    /// Deletes every key containing `pattern`.
    ///
    /// Backends that cannot enumerate keys are flushed entirely instead, so
    /// stale data is never served.
    pub fn forget_by_pattern(&self, pattern: &str) -> bool {
        if !self.backend.supports_key_scan() {
            warn!(
                pattern,
                driver = self.backend.driver(),
                "Backend cannot scan keys, flushing entire cache"
            );
            return self.flush();
        }

        match self.delete_matching(pattern) {
            Ok(removed) => {
                info!(pattern, removed, "Invalidated keys by pattern");
                true
            }
            Err(BackendError::Unsupported(_)) => {
                warn!(pattern, "Key scan unsupported, flushing entire cache");
                self.flush()
            }
            Err(err) => {
                warn!(pattern, error = %err, "Pattern invalidation failed");
                false
            }
        }
    }

    fn delete_matching(&self, pattern: &str) -> BackendResult<usize> {
        let keys = self.backend.keys_matching(pattern)?;
        let mut removed = 0;
        for key in &keys {
            if self.backend.delete(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Invalidates every key generated for `module`.
    pub fn forget_module(&self, module: &str) -> bool {
        let prefix = self.keys.module_prefix(module);
        self.forget_by_pattern(&prefix)
    }

    // == Flush ==
    /// Empties the backend.
    pub fn flush(&self) -> bool {
        match self.backend.flush_all() {
            Ok(flushed) => {
                info!(driver = self.backend.driver(), "Cache flushed");
                flushed
            }
            Err(err) => {
                warn!(error = %err, "Cache flush failed");
                false
            }
        }
    }

    // == Has ==
    /// Whether `key` holds a live entry.
    ///
    /// Reports raw presence in the backend without decoding, so a malformed
    /// envelope still counts as present; [`CacheFacade::get`] treats it as a
    /// miss and [`CacheFacade::forget`] removes it. Does not affect hit/miss
    /// telemetry.
    pub fn has(&self, key: &str) -> bool {
        match self.backend.contains(key) {
            Ok(found) => found,
            Err(err) => {
                warn!(key, error = %err, "Cache existence check failed");
                false
            }
        }
    }

    // == Refresh ==
    /// Rewrites the current value of `key` with a fresh TTL.
    ///
    /// Returns `false` if the key is absent or the rewrite fails.
    pub fn refresh(&self, key: &str, ttl: impl Into<Ttl>) -> bool {
        match self.get::<serde_json::Value>(key) {
            Some(value) => self.put(key, &value, ttl),
            None => false,
        }
    }

    // == Stats ==
    /// Diagnostic snapshot of the backend.
    pub fn stats(&self) -> StatsSnapshot {
        let driver = self.backend.driver().to_string();
        match self.backend.info() {
            Ok(info) => StatsSnapshot::from_info(driver, info),
            Err(BackendError::Unsupported(_)) => StatsSnapshot::Minimal {
                driver,
                message: "Detailed statistics not available for this driver".to_string(),
            },
            Err(err) => {
                warn!(error = %err, "Cache stats failed");
                StatsSnapshot::Error {
                    error: err.to_string(),
                }
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendInfo, MemoryBackend};
    use crate::cache::TtlTier;
    use serde_json::json;
    use std::cell::Cell;
    use std::time::Duration;

    fn facade() -> CacheFacade {
        CacheFacade::new(Arc::new(MemoryBackend::new(100)), "agro")
    }

    /// Backend that fails every call.
    struct BrokenBackend;

    impl CacheBackend for BrokenBackend {
        fn driver(&self) -> &str {
            "broken"
        }
        fn get(&self, _key: &str) -> BackendResult<Option<Vec<u8>>> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
        fn put(&self, _key: &str, _bytes: Vec<u8>, _ttl: Duration) -> BackendResult<bool> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
        fn delete(&self, _key: &str) -> BackendResult<bool> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
        fn flush_all(&self) -> BackendResult<bool> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
        fn supports_key_scan(&self) -> bool {
            true
        }
        fn keys_matching(&self, _pattern: &str) -> BackendResult<Vec<String>> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
        fn info(&self) -> BackendResult<BackendInfo> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_put_and_get() {
        let cache = facade();
        assert!(cache.put("agro_prod_all", &vec!["p1", "p2"], TtlTier::Short));

        let value: Option<Vec<String>> = cache.get("agro_prod_all");
        assert_eq!(value, Some(vec!["p1".to_string(), "p2".to_string()]));
    }

    #[test]
    fn test_get_or_default() {
        let cache = facade();
        let value: Vec<String> = cache.get_or("missing", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback"]);
    }

    #[test]
    fn test_get_entry_metadata() {
        let cache = facade();
        cache.put("k", &1u32, 42u64);

        let entry: CacheEntry<u32> = cache.get_entry("k").unwrap();
        assert_eq!(entry.key, "k");
        assert_eq!(entry.value, 1);
        assert_eq!(
            entry.expires_at - entry.cached_at,
            chrono::Duration::minutes(42)
        );
    }

    #[test]
    fn test_malformed_envelope_is_miss() {
        let backend = Arc::new(MemoryBackend::new(10));
        let cache = CacheFacade::new(backend.clone(), "agro");
        backend
            .put("raw", br#"{"not":"an envelope"}"#.to_vec(), Duration::from_secs(60))
            .unwrap();

        assert!(cache.has("raw"));
        assert_eq!(cache.get::<serde_json::Value>("raw"), None);
    }

    #[test]
    fn test_remember_computes_once() {
        let cache = facade();
        let calls = Cell::new(0);

        let first = cache.remember(
            "agro_dash_summary",
            || {
                calls.set(calls.get() + 1);
                json!({"animals": 120})
            },
            TtlTier::Medium,
        );
        let second = cache.remember(
            "agro_dash_summary",
            || {
                calls.set(calls.get() + 1);
                json!({"animals": 0})
            },
            TtlTier::Medium,
        );

        assert_eq!(calls.get(), 1);
        assert_eq!(first, json!({"animals": 120}));
        assert_eq!(second, first);
    }

    #[test]
    fn test_remember_stored_null_is_a_hit() {
        let cache = facade();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            None::<String>
        };

        assert_eq!(cache.remember("nothing", compute, TtlTier::Short), None);
        assert_eq!(cache.remember("nothing", compute, TtlTier::Short), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_try_remember_does_not_cache_errors() {
        let cache = facade();

        let failed: Result<Vec<u32>, String> =
            cache.try_remember("report", || Err("query failed".to_string()), TtlTier::Long);
        assert!(failed.is_err());
        assert!(!cache.has("report"));

        let ok: Result<Vec<u32>, String> = cache.try_remember("report", || Ok(vec![7]), TtlTier::Long);
        assert_eq!(ok, Ok(vec![7]));

        let cached: Result<Vec<u32>, String> =
            cache.try_remember("report", || Err("unreachable".to_string()), TtlTier::Long);
        assert_eq!(cached, Ok(vec![7]));
    }

    #[test]
    fn test_forget() {
        let cache = facade();
        cache.put("k", &"v", TtlTier::Short);

        assert!(cache.forget("k"));
        assert!(!cache.has("k"));
        assert_eq!(cache.get_or("k", "default".to_string()), "default");
        assert!(!cache.forget("k"));
    }

    #[test]
    fn test_forget_many_reports_per_key() {
        let cache = facade();
        cache.put("a", &1, TtlTier::Short);
        cache.put("b", &2, TtlTier::Short);

        let outcome = cache.forget_many(["a", "b", "c"]);
        assert_eq!(outcome.get("a"), Some(&true));
        assert_eq!(outcome.get("b"), Some(&true));
        assert_eq!(outcome.get("c"), Some(&false));
    }

    #[test]
    fn test_forget_module_scoped() {
        let cache = facade();
        let prod_all = cache.generate_key("produtor", "all", &json!({"page": 1}));
        let prod_one = cache.generate_key("produtor", "show", &json!({"id": 3}));
        let prop_all = cache.generate_key("propriedade", "all", &json!({"page": 1}));
        for key in [&prod_all, &prod_one, &prop_all] {
            cache.put(key, &"data", TtlTier::Short);
        }

        assert!(cache.forget_module("produtor"));
        assert!(!cache.has(&prod_all));
        assert!(!cache.has(&prod_one));
        assert!(cache.has(&prop_all));
    }

    #[test]
    fn test_forget_by_pattern_flushes_without_scan() {
        let cache = CacheFacade::new(Arc::new(MemoryBackend::new(10).without_key_scan()), "agro");
        cache.put("agro_prod_all", &1, TtlTier::Short);
        cache.put("agro_prop_all", &2, TtlTier::Short);

        assert!(cache.forget_by_pattern("prod"));
        assert!(!cache.has("agro_prod_all"));
        assert!(!cache.has("agro_prop_all"));
    }

    #[test]
    fn test_refresh() {
        let cache = facade();
        assert!(!cache.refresh("missing", TtlTier::Daily));

        cache.put("k", &json!([1, 2]), TtlTier::Short);
        assert!(cache.refresh("k", TtlTier::Daily));

        let entry: CacheEntry<serde_json::Value> = cache.get_entry("k").unwrap();
        assert_eq!(entry.value, json!([1, 2]));
        assert_eq!(
            entry.expires_at - entry.cached_at,
            chrono::Duration::minutes(1440)
        );
    }

    #[test]
    fn test_stats_from_memory_backend() {
        let cache = facade();
        cache.put("k", &1, TtlTier::Short);
        let _: Option<u32> = cache.get("k");
        let _: Option<u32> = cache.get("missing");

        match cache.stats() {
            StatsSnapshot::Telemetry {
                driver,
                total_entries,
                hits,
                misses,
                hit_rate,
                ..
            } => {
                assert_eq!(driver, "memory");
                assert_eq!(total_entries, 1);
                assert_eq!(hits, 1);
                assert_eq!(misses, 1);
                assert_eq!(hit_rate, 50.0);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }

    #[test]
    fn test_has_leaves_hit_rate_alone() {
        let cache = facade();
        cache.put("k", &1, TtlTier::Short);
        assert!(cache.has("k"));
        assert!(!cache.has("missing"));

        match cache.stats() {
            StatsSnapshot::Telemetry { hits, misses, .. } => assert_eq!((hits, misses), (0, 0)),
            other => panic!("unexpected stats: {:?}", other),
        }
    }

    #[test]
    fn test_huge_minute_count_keeps_backend_usable() {
        let cache = facade();

        assert!(cache.put("forever", &1, u64::MAX));
        assert_eq!(cache.get::<u32>("forever"), Some(1));

        let entry: CacheEntry<u32> = cache.get_entry("forever").unwrap();
        assert!(entry.expires_at > entry.cached_at);

        assert!(cache.put("other", &2, TtlTier::Short));
        assert!(cache.flush());
        assert!(!cache.has("other"));
    }

    #[test]
    fn test_broken_backend_fails_open() {
        let cache = CacheFacade::new(Arc::new(BrokenBackend), "agro");

        assert_eq!(cache.get::<String>("k"), None);
        assert_eq!(cache.get_or("k", 5u32), 5);
        assert!(!cache.has("k"));
        assert!(!cache.put("k", &"v", TtlTier::Short));
        assert!(!cache.forget("k"));
        assert!(!cache.forget_by_pattern("k"));
        assert!(!cache.forget_module("produtor"));
        assert!(!cache.flush());
        assert!(!cache.refresh("k", TtlTier::Short));
        assert_eq!(cache.remember("k", || vec![1, 2], TtlTier::Short), vec![1, 2]);
        assert!(matches!(cache.stats(), StatsSnapshot::Error { .. }));
    }
}
