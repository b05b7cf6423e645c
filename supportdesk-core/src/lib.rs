//! SupportDesk Core Library
//!
//! Shared types, validation, and document handling for the SupportDesk
//! white-label support viewer. This crate has no I/O of its own; the client
//! crate layers HTTP, storage, and the configuration loader on top of it.

pub mod config;
pub mod documents;
pub mod error;
pub mod validation;

// Re-export commonly used types
pub use config::{
    default_cache_dir, default_settings_path, flag_enabled, CachedConfig, Configuration,
    ContactInfo, DocumentCollectionConfig, Features, RegionGroup, RegionalContact, Theme,
    ThemeConfig, CONFIG_CACHE_KEY, CONFIG_CACHE_TTL_MS,
};
pub use documents::{
    all_tags, fallback_documents, resolve_file_url, DocumentIcon, DocumentQuery, DocumentType,
    ManifestItem, Placeholders, SupportDocument,
};
pub use error::*;
pub use validation::{lint, ConfigWarning};
