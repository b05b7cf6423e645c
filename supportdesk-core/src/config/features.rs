//! Named boolean feature flags

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Look up a flag, treating unknown names as disabled.
pub fn flag_enabled(flags: &HashMap<String, bool>, name: &str) -> bool {
    flags.get(name).copied().unwrap_or(false)
}

/// Feature flags carried by a [`Configuration`](super::Configuration).
///
/// The four document and filtering toggles are required by validation;
/// any other named boolean is preserved as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Features(BTreeMap<String, bool>);

impl Features {
    pub const TAG_FILTERING: &'static str = "tagFiltering";
    pub const PDF_DOCUMENTS: &'static str = "pdfDocuments";
    pub const WORD_DOCUMENTS: &'static str = "wordDocuments";
    pub const IMAGE_DOCUMENTS: &'static str = "imageDocuments";

    /// Flags every configuration must declare.
    pub const REQUIRED: [&'static str; 4] = [
        Self::TAG_FILTERING,
        Self::PDF_DOCUMENTS,
        Self::WORD_DOCUMENTS,
        Self::IMAGE_DOCUMENTS,
    ];

    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for Features {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_enabled_defaults_to_false() {
        let mut flags = HashMap::new();
        flags.insert("newViewer".to_string(), true);
        flags.insert("beta".to_string(), false);

        assert!(flag_enabled(&flags, "newViewer"));
        assert!(!flag_enabled(&flags, "beta"));
        assert!(!flag_enabled(&flags, "unknown"));
        assert!(!flag_enabled(&HashMap::new(), "newViewer"));
    }

    #[test]
    fn test_features_lookup() {
        let mut features = Features::default();
        features.set(Features::PDF_DOCUMENTS, true);
        features.set(Features::WORD_DOCUMENTS, false);

        assert!(features.is_enabled(Features::PDF_DOCUMENTS));
        assert!(!features.is_enabled(Features::WORD_DOCUMENTS));
        assert!(!features.is_enabled("missing"));
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn test_features_serialize_as_flat_map() {
        let features: Features = vec![
            ("tagFiltering".to_string(), true),
            ("customFlag".to_string(), false),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(json, r#"{"customFlag":false,"tagFiltering":true}"#);

        let parsed: Features = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, features);
    }
}
