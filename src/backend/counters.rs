//! Backend Counters Module
//!
//! Hit, miss and eviction counters kept by the in-memory backend.

use serde::Serialize;

// == Backend Counters ==
/// Read and eviction counters for a single backend instance.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BackendCounters {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped to stay under capacity
    pub evictions: u64,
}

impl BackendCounters {
    /// Creates counters with everything at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Percentage of reads that were hits, rounded to two decimals.
    ///
    /// Returns 0.0 if no reads have been made.
    pub fn hit_rate_percent(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        let ratio = self.hits as f64 / total as f64;
        (ratio * 10_000.0).round() / 100.0
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Zeroes every counter. Used on flush.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let counters = BackendCounters::new();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(BackendCounters::new().hit_rate_percent(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut counters = BackendCounters::new();
        counters.record_hit();
        counters.record_hit();
        assert_eq!(counters.hit_rate_percent(), 100.0);
    }

    #[test]
    fn test_hit_rate_rounded_to_two_decimals() {
        let mut counters = BackendCounters::new();
        counters.record_hit();
        counters.record_miss();
        counters.record_miss();
        assert_eq!(counters.hit_rate_percent(), 33.33);
    }

    #[test]
    fn test_reset() {
        let mut counters = BackendCounters::new();
        counters.record_hit();
        counters.record_miss();
        counters.record_eviction();
        counters.reset();
        assert_eq!(counters.hits + counters.misses + counters.evictions, 0);
    }
}
