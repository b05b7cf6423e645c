//! Configuration types for SupportDesk
//!
//! A [`Configuration`] describes one white-label deployment: branding,
//! contacts, feature flags, themes, and where the document collections live.
//!
//! # Architecture
//!
//! - [`Configuration`] - The deployment record served as `app.config.json`
//! - [`ContactInfo`] - Help desk emails and regional offices
//! - [`Features`] - Named boolean feature flags
//! - [`ThemeConfig`] - Default theme, switcher toggle, and theme list
//! - [`CachedConfig`] - Envelope persisted by the client-side config cache
//!
//! Shape and semantic checks live in [`crate::validation`].

mod app_config;
mod contacts;
mod envelope;
mod features;
mod paths;
mod theme;

pub use app_config::{Configuration, DocumentCollectionConfig};
pub use contacts::{ContactInfo, RegionGroup, RegionalContact};
pub use envelope::{CachedConfig, CONFIG_CACHE_KEY, CONFIG_CACHE_TTL_MS};
pub use features::{flag_enabled, Features};
pub use paths::{default_cache_dir, default_settings_path};
pub use theme::{Theme, ThemeConfig};
