//! Network-facing traits
//!
//! The loader, flag lookup and library depend on these rather than on
//! [`SupportDeskClient`](crate::client::SupportDeskClient) so tests can
//! supply fakes.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use supportdesk_core::{Configuration, Result};

/// Source of the deployment configuration.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch and validate the configuration.
    ///
    /// Transport failures are `SupportDeskError::Fetch`, bad payloads are
    /// `SupportDeskError::Validation`.
    async fn fetch_config(&self) -> Result<Configuration>;
}

/// Source of the runtime feature-flags document.
#[async_trait]
pub trait FlagSource: Send + Sync {
    async fn fetch_flags(&self) -> Result<HashMap<String, bool>>;
}

/// Source of collection manifests and document bodies.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch a manifest as raw entries.
    ///
    /// Only a body that is not a JSON array fails here; each entry is
    /// decoded by the caller so one malformed item cannot sink the rest.
    async fn fetch_manifest(&self, path: &str) -> Result<Vec<Value>>;

    async fn fetch_text(&self, path: &str) -> Result<String>;
}
