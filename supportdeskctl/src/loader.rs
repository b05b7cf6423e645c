//! Stale-while-revalidate configuration loading
//!
//! [`ConfigLoader::start`] reads the cache synchronously, publishes what it
//! finds, then refreshes from the network in a background task. The result
//! of the refresh is chosen by [`settle`]: fresh network data first, then a
//! still-valid cached copy, then the error.
//!
//! Dropping the [`ConfigHandle`] (and any receivers it handed out) tears the
//! consumer down; a refresh that completes afterwards is discarded.

use serde::Serialize;
use std::sync::Arc;
use supportdesk_core::{Configuration, Result, SupportDeskError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ConfigCache;
use crate::source::ConfigSource;

/// Where the exposed configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    None,
    Cache,
    Network,
}

/// Composite state exposed to the rest of the application.
#[derive(Debug, Clone)]
pub struct ConfigState {
    pub config: Option<Arc<Configuration>>,
    /// True only while nothing, cached or fresh, is available yet
    pub is_loading: bool,
    pub error: Option<Arc<SupportDeskError>>,
    pub source: Provenance,
    /// The background refresh has finished
    pub settled: bool,
}

impl ConfigState {
    /// State seeded from the cache before the refresh runs.
    fn initial(cached: Option<Configuration>) -> Self {
        match cached {
            Some(config) => Self {
                config: Some(Arc::new(config)),
                is_loading: false,
                error: None,
                source: Provenance::Cache,
                settled: false,
            },
            None => Self {
                config: None,
                is_loading: true,
                error: None,
                source: Provenance::None,
                settled: false,
            },
        }
    }
}

/// Pick the state to expose once the network fetch has resolved.
///
/// `stale` is consulted only when the fetch failed.
pub fn settle(
    fresh: Result<Configuration>,
    stale: impl FnOnce() -> Option<Configuration>,
) -> ConfigState {
    let (config, error, source) = match fresh {
        Ok(config) => (Some(config), None, Provenance::Network),
        Err(e) => match stale() {
            Some(cached) => {
                info!(error = %e, "refresh failed, serving cached configuration");
                (Some(cached), None, Provenance::Cache)
            }
            None => {
                warn!(error = %e, "no configuration available");
                (None, Some(Arc::new(e)), Provenance::None)
            }
        },
    };

    ConfigState {
        config: config.map(Arc::new),
        is_loading: false,
        error,
        source,
        settled: true,
    }
}

/// Runs the load protocol against one cache and one source.
#[derive(Clone)]
pub struct ConfigLoader {
    cache: Arc<ConfigCache>,
    source: Arc<dyn ConfigSource>,
}

impl ConfigLoader {
    pub fn new(cache: Arc<ConfigCache>, source: Arc<dyn ConfigSource>) -> Self {
        Self { cache, source }
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// Publish the cached state and spawn the background refresh.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> ConfigHandle {
        let initial = ConfigState::initial(self.cache.get_cached());
        debug!(source = ?initial.source, "seeded configuration state");

        let (tx, rx) = watch::channel(initial);
        let cache = Arc::clone(&self.cache);
        let source = Arc::clone(&self.source);

        let task = tokio::spawn(async move {
            let fresh = source.fetch_config().await;

            if tx.is_closed() {
                debug!("configuration consumer detached, discarding refresh");
                return;
            }

            if let Ok(config) = &fresh {
                cache.set_cached(config);
            }
            let state = settle(fresh, || cache.get_cached());

            if tx.send(state).is_err() {
                debug!("configuration consumer detached before publish");
            }
        });

        ConfigHandle { rx, task }
    }

    /// Run the protocol and wait for it to settle.
    pub async fn load(&self) -> ConfigState {
        self.start().settled().await
    }
}

/// Consumer side of a running load.
#[derive(Debug)]
pub struct ConfigHandle {
    rx: watch::Receiver<ConfigState>,
    task: JoinHandle<()>,
}

impl ConfigHandle {
    pub fn current(&self) -> ConfigState {
        self.rx.borrow().clone()
    }

    /// Additional receiver; the refresh keeps publishing while any exists.
    pub fn subscribe(&self) -> watch::Receiver<ConfigState> {
        self.rx.clone()
    }

    /// Wait for the background refresh to finish.
    pub async fn settled(mut self) -> ConfigState {
        let settled = self
            .rx
            .wait_for(|state| state.settled)
            .await
            .map(|state| state.clone())
            .ok();

        settled.unwrap_or_else(|| self.rx.borrow().clone())
    }

    /// Tear the consumer down and hand back the refresh task.
    pub fn detach(self) -> JoinHandle<()> {
        let ConfigHandle { rx, task } = self;
        drop(rx);
        task
    }
}
