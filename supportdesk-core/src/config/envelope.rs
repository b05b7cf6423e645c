//! Envelope for the persisted configuration cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Configuration;

/// Storage key holding the serialized envelope.
pub const CONFIG_CACHE_KEY: &str = "enterprise-support-app-config-cache";

/// Maximum age of a cached configuration: 24 hours, in milliseconds.
pub const CONFIG_CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// A configuration captured at `timestamp` (Unix epoch milliseconds).
///
/// `version` mirrors `data.version` so the schema version can be read
/// without decoding the whole payload. The cache reads envelopes as
/// `CachedConfig<serde_json::Value>` and validates `data` separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedConfig<T = Configuration> {
    pub data: T,
    pub timestamp: i64,
    pub version: String,
}

impl<'a> CachedConfig<&'a Configuration> {
    /// Wrap a configuration captured at `now`.
    pub fn capture(config: &'a Configuration, now: DateTime<Utc>) -> Self {
        Self {
            data: config,
            timestamp: now.timestamp_millis(),
            version: config.version.clone(),
        }
    }
}

impl<T> CachedConfig<T> {
    /// Age of the envelope in milliseconds relative to `now`, saturating
    /// at the bounds of `i64`.
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis().saturating_sub(self.timestamp)
    }

    /// An envelope whose age has reached `ttl_ms` is expired. So is one
    /// whose age cannot be represented.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_ms: i64) -> bool {
        match now.timestamp_millis().checked_sub(self.timestamp) {
            Some(age) => age >= ttl_ms,
            None => true,
        }
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
