//! Runtime feature flags
//!
//! Flags live in their own document, independent of the configuration
//! cache. The first successful fetch is kept for the lifetime of the
//! [`FlagLookup`]; there is no TTL and nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;
use supportdesk_core::flag_enabled;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::source::FlagSource;

pub struct FlagLookup {
    source: Arc<dyn FlagSource>,
    flags: OnceCell<HashMap<String, bool>>,
}

impl FlagLookup {
    pub fn new(source: Arc<dyn FlagSource>) -> Self {
        Self {
            source,
            flags: OnceCell::new(),
        }
    }

    /// The memoized flags, fetching them on first use.
    ///
    /// A failed fetch is not memoized; the next call tries again.
    pub async fn flags(&self) -> Option<&HashMap<String, bool>> {
        let result = self
            .flags
            .get_or_try_init(|| async { self.source.fetch_flags().await })
            .await;

        match result {
            Ok(flags) => Some(flags),
            Err(e) => {
                warn!(error = %e, "feature flags unavailable, treating all as disabled");
                None
            }
        }
    }

    /// Whether `name` is enabled; unknown flags and fetch failures are `false`.
    pub async fn is_enabled(&self, name: &str) -> bool {
        self.flags()
            .await
            .map(|flags| flag_enabled(flags, name))
            .unwrap_or(false)
    }

    pub fn is_memoized(&self) -> bool {
        self.flags.initialized()
    }
}
