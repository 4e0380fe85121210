//! Agro Cache - Tiered read-through cache layer
//!
//! Namespaced key generation, TTL tiers, compute-or-fetch reads and
//! module-scoped invalidation over a pluggable key-value backend. Backend
//! failures never reach callers: reads miss, writes report `false`.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use backend::{CacheBackend, MemoryBackend};
pub use cache::{CacheFacade, Ttl, TtlTier};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
