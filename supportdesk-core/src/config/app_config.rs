//! The deployment configuration record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ContactInfo, Features, ThemeConfig};
use crate::error::ValidationError;
use crate::validation;

/// One document collection: a named manifest location with optional ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCollectionConfig {
    /// Friendly name of the collection
    pub name: String,
    /// Path (or URL) of the collection's `manifest.json`
    pub path: String,
    /// Sort position; lower values come first, absent values come last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Versioned description of a deployment's branding and behavior.
///
/// Served to clients as `app.config.json`. The wire format uses camelCase
/// keys and carries the schema version under `$version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Schema version in `<major>.<minor>` form
    #[serde(rename = "$version", alias = "version")]
    pub version: String,
    pub company_name: String,
    pub app_name: String,
    /// Reverse-domain application identifier (`com.acme.support`)
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_subtitle: Option<String>,
    /// Primary email domain, without `@`
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn_portal: Option<String>,
    pub contacts: ContactInfo,
    pub features: Features,
    pub theme: ThemeConfig,
    pub documents: Vec<DocumentCollectionConfig>,
}

impl Configuration {
    /// Validate an untyped JSON value and convert it into a Configuration.
    ///
    /// Runs the structural check first so that missing or mistyped fields are
    /// reported by name, then the format and cross-field checks.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        validation::check_shape(&value)?;

        let config: Configuration = serde_json::from_value(value)
            .map_err(|e| ValidationError::new("$root", e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ValidationError::new("$root", format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Run the format and cross-field checks on an already typed value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::check_semantics(self)
    }

    /// Serialize to pretty JSON in wire format.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Schema version split into `(major, minor)`.
    pub fn version_parts(&self) -> Option<(u32, u32)> {
        let (major, minor) = self.version.split_once('.')?;
        Some((major.parse().ok()?, minor.parse().ok()?))
    }

    /// Document collections ordered by position.
    ///
    /// Positioned collections come first in ascending order; the rest keep
    /// their configured order.
    pub fn ordered_collections(&self) -> Vec<&DocumentCollectionConfig> {
        let mut collections: Vec<&DocumentCollectionConfig> = self.documents.iter().collect();
        collections.sort_by_key(|c| match c.position {
            Some(position) => (0, position),
            None => (1, 0),
        });
        collections
    }
}
