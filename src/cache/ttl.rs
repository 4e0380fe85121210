//! TTL Tier Module
//!
//! Named TTL buckets and resolution of caller-supplied TTLs to durations.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// Longest TTL honoured (100 years). Larger minute counts are clamped.
pub const MAX_TTL_MINUTES: u64 = 100 * 365 * 24 * 60;

// == TTL Tier ==
/// Named TTL bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TtlTier {
    /// 5 minutes
    Short,
    /// 30 minutes
    #[default]
    Medium,
    /// 2 hours
    Long,
    /// 1 day
    Daily,
    /// 1 week
    Weekly,
}

impl TtlTier {
    pub const ALL: [TtlTier; 5] = [
        TtlTier::Short,
        TtlTier::Medium,
        TtlTier::Long,
        TtlTier::Daily,
        TtlTier::Weekly,
    ];

    pub fn minutes(self) -> u64 {
        match self {
            TtlTier::Short => 5,
            TtlTier::Medium => 30,
            TtlTier::Long => 120,
            TtlTier::Daily => 1440,
            TtlTier::Weekly => 10080,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TtlTier::Short => "short",
            TtlTier::Medium => "medium",
            TtlTier::Long => "long",
            TtlTier::Daily => "daily",
            TtlTier::Weekly => "weekly",
        }
    }

    /// Looks up a tier by its (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for TtlTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == TTL ==
/// TTL accepted by the facade: a named tier or a raw minute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Tier(TtlTier),
    Minutes(u64),
}

impl Ttl {
    // == Parse ==
    /// Resolves a textual TTL.
    ///
    /// Tier names map to their tier, decimal strings to a minute count.
    /// Anything else falls back to the default tier.
    pub fn parse(raw: &str) -> Self {
        if let Some(tier) = TtlTier::from_name(raw) {
            return Ttl::Tier(tier);
        }
        match raw.trim().parse::<u64>() {
            Ok(minutes) => Ttl::Minutes(minutes),
            Err(_) => {
                warn!(ttl = raw, "Unknown TTL tier, using default");
                Ttl::default()
            }
        }
    }

    pub fn minutes(self) -> u64 {
        match self {
            Ttl::Tier(tier) => tier.minutes(),
            Ttl::Minutes(minutes) => minutes,
        }
    }

    /// Resolved lifetime, clamped to [`MAX_TTL_MINUTES`].
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.minutes().min(MAX_TTL_MINUTES) * 60)
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::Tier(TtlTier::default())
    }
}

impl From<TtlTier> for Ttl {
    fn from(tier: TtlTier) -> Self {
        Ttl::Tier(tier)
    }
}

impl From<u64> for Ttl {
    fn from(minutes: u64) -> Self {
        Ttl::Minutes(minutes)
    }
}

impl From<&str> for Ttl {
    fn from(raw: &str) -> Self {
        Ttl::parse(raw)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Tier(tier) => write!(f, "{} ({}m)", tier, tier.minutes()),
            Ttl::Minutes(minutes) => write!(f, "{}m", minutes),
        }
    }
}

// Tiers serialize as their name, raw counts as a number.
impl Serialize for Ttl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ttl::Tier(tier) => serializer.serialize_str(tier.name()),
            Ttl::Minutes(minutes) => serializer.serialize_u64(*minutes),
        }
    }
}

impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Minutes(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Minutes(minutes) => Ttl::Minutes(minutes),
            Raw::Text(text) => Ttl::parse(&text),
        })
    }
}
