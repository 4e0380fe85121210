//! Cache Statistics Module
//!
//! Diagnostic snapshot returned by [`crate::cache::CacheFacade::stats`].

use serde::Serialize;

use crate::backend::{BackendCounters, BackendInfo};

// == Stats Snapshot ==
/// Backend-dependent statistics, serialized as a flat JSON map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsSnapshot {
    /// Backend exposes usage telemetry
    Telemetry {
        driver: String,
        total_entries: usize,
        used_memory_bytes: usize,
        hits: u64,
        misses: u64,
        evictions: u64,
        /// Hit percentage, two decimals
        hit_rate: f64,
    },
    /// Backend has no telemetry
    Minimal { driver: String, message: String },
    /// Telemetry request failed
    Error { error: String },
}

impl StatsSnapshot {
    pub fn from_info(driver: String, info: BackendInfo) -> Self {
        let counters = BackendCounters {
            hits: info.hits,
            misses: info.misses,
            evictions: info.evictions,
        };
        StatsSnapshot::Telemetry {
            driver,
            total_entries: info.total_entries,
            used_memory_bytes: info.used_memory_bytes,
            hits: info.hits,
            misses: info.misses,
            evictions: info.evictions,
            hit_rate: counters.hit_rate_percent(),
        }
    }
}
