//! SupportDesk client library
//!
//! Loads a deployment's configuration with a stale-while-revalidate cache,
//! resolves its document collections, and answers runtime feature-flag
//! queries.
//!
//! # Public API
//!
//! [`client::SupportDeskClient`] talks to the asset server,
//! [`cache::ConfigCache`] persists the last good configuration and
//! [`loader::ConfigLoader`] combines the two.
//!
//! ```no_run
//! use std::sync::Arc;
//! use supportdeskctl::cache::ConfigCache;
//! use supportdeskctl::client::SupportDeskClient;
//! use supportdeskctl::loader::ConfigLoader;
//! use supportdeskctl::storage::FileStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = SupportDeskClient::new("http://localhost:8080", 10)?;
//! let cache = ConfigCache::new(FileStore::new("/tmp/supportdesk"));
//! let loader = ConfigLoader::new(Arc::new(cache), Arc::new(client));
//!
//! let state = loader.load().await;
//! if let Some(config) = state.config {
//!     println!("{} ({:?})", config.app_name, state.source);
//! }
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Persistent configuration cache with a time-to-live.
pub mod cache;

/// HTTP client for the SupportDesk asset server.
pub mod client;

/// Runtime feature-flag lookup.
pub mod flags;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Document collection loading.
pub mod library;

/// Stale-while-revalidate configuration loader.
pub mod loader;

/// Settings of the client itself.
pub mod settings;

/// Traits at the network boundary.
pub mod source;

/// Key-value storage backends.
pub mod storage;

// Mock asset server shared by unit and integration tests
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
