//! Cache Module
//!
//! Tiered read-through cache facade: key scheme, TTL tiers, stored envelope
//! and module-scoped invalidation.

mod entry;
mod facade;
mod keys;
mod stats;
mod ttl;


// Re-export public types
pub use entry::CacheEntry;
pub use facade::CacheFacade;
pub use keys::{fingerprint, KeyGenerator, ModulePrefixes, DEFAULT_MODULE_PREFIXES};
pub use stats::StatsSnapshot;
pub use ttl::{Ttl, TtlTier, MAX_TTL_MINUTES};
