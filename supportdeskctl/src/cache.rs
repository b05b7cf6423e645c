//! Persistent configuration cache
//!
//! The last configuration fetched successfully is kept in a
//! [`KeyValueStore`] as a [`CachedConfig`] envelope under
//! [`CONFIG_CACHE_KEY`]. Reads evict entries that are expired or fail
//! validation; writes are best-effort and never fail the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use supportdesk_core::{
    CachedConfig, Configuration, Result, CONFIG_CACHE_KEY, CONFIG_CACHE_TTL_MS,
};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Diagnostics for the stored envelope, as returned by [`ConfigCache::inspect`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntryInfo {
    pub version: String,
    pub captured_at: Option<DateTime<Utc>>,
    pub age_ms: i64,
    pub expired: bool,
    /// Validation failure of the payload, if any
    pub invalid: Option<String>,
}

/// TTL-bounded cache slot for the deployment configuration.
pub struct ConfigCache {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
}

impl std::fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("ttl_ms", &self.ttl_ms)
            .finish_non_exhaustive()
    }
}

impl ConfigCache {
    /// Cache over `store` with the default 24 hour TTL and the system clock.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            clock: Arc::new(SystemClock),
            ttl_ms: CONFIG_CACHE_TTL_MS,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Read the cached configuration.
    ///
    /// Returns `None` when nothing is stored, when the entry's age has
    /// reached the TTL, or when its payload does not validate. The last two
    /// cases remove the entry.
    pub fn get_cached(&self) -> Option<Configuration> {
        let raw = match self.store.get(CONFIG_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read cached configuration");
                return None;
            }
        };

        match self.decode(&raw) {
            Ok(config) => {
                debug!(version = %config.version, "using cached configuration");
                Some(config)
            }
            Err(reason) => {
                warn!(%reason, "evicting cached configuration");
                self.evict();
                None
            }
        }
    }

    /// Store `config` with the current timestamp.
    ///
    /// Storage failures are logged and swallowed.
    pub fn set_cached(&self, config: &Configuration) {
        let envelope = CachedConfig::capture(config, self.clock.now());
        let serialized = match serde_json::to_string(&envelope) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(error = %e, "failed to serialize configuration for caching");
                return;
            }
        };

        if let Err(e) = self.store.set(CONFIG_CACHE_KEY, &serialized) {
            warn!(error = %e, "failed to cache configuration");
        }
    }

    /// Remove the cached entry.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(CONFIG_CACHE_KEY)
    }

    /// Describe the stored envelope without evicting it.
    ///
    /// An unreadable envelope is reported as a serialization error.
    pub fn inspect(&self) -> Result<Option<CacheEntryInfo>> {
        let Some(raw) = self.store.get(CONFIG_CACHE_KEY)? else {
            return Ok(None);
        };
        let envelope: CachedConfig<Value> = serde_json::from_str(&raw)?;
        let now = self.clock.now();

        let invalid = Configuration::from_value(envelope.data.clone())
            .err()
            .map(|e| e.to_string());

        Ok(Some(CacheEntryInfo {
            version: envelope.version.clone(),
            captured_at: envelope.captured_at(),
            age_ms: envelope.age_ms(now),
            expired: envelope.is_expired(now, self.ttl_ms),
            invalid,
        }))
    }

    fn decode(&self, raw: &str) -> std::result::Result<Configuration, String> {
        let envelope: CachedConfig<Value> =
            serde_json::from_str(raw).map_err(|e| format!("unreadable envelope: {}", e))?;

        let now = self.clock.now();
        if envelope.is_expired(now, self.ttl_ms) {
            return Err(format!("expired after {} ms", envelope.age_ms(now)));
        }

        let config = Configuration::from_value(envelope.data).map_err(|e| e.to_string())?;
        if config.version != envelope.version {
            return Err(format!(
                "envelope version {} does not match payload version {}",
                envelope.version, config.version
            ));
        }

        Ok(config)
    }

    fn evict(&self) {
        if let Err(e) = self.store.remove(CONFIG_CACHE_KEY) {
            warn!(error = %e, "failed to evict cached configuration");
        }
    }
}
