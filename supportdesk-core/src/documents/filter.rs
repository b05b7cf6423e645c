//! Document search and tag filtering

use std::collections::BTreeSet;

use super::SupportDocument;
use crate::config::Features;

/// Search text plus selected tags.
///
/// A document matches when the search text appears in its title or category
/// (case-insensitive) and it carries every selected tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub search: Option<String>,
    pub tags: Vec<String>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Drop the tag selection when tag filtering is switched off.
    pub fn for_features(mut self, features: &Features) -> Self {
        if !features.is_enabled(Features::TAG_FILTERING) {
            self.tags.clear();
        }
        self
    }

    pub fn matches(&self, doc: &SupportDocument) -> bool {
        let text_match = match &self.search {
            Some(search) => {
                let needle = search.to_lowercase();
                doc.title.to_lowercase().contains(&needle)
                    || doc.category.to_lowercase().contains(&needle)
            }
            None => true,
        };

        text_match && self.tags.iter().all(|tag| doc.has_tag(tag))
    }

    pub fn apply<'a>(
        &self,
        docs: impl IntoIterator<Item = &'a SupportDocument>,
    ) -> Vec<&'a SupportDocument> {
        docs.into_iter().filter(|d| self.matches(d)).collect()
    }
}

/// Distinct tags across documents, sorted.
pub fn all_tags<'a>(docs: impl IntoIterator<Item = &'a SupportDocument>) -> Vec<String> {
    docs.into_iter()
        .flat_map(|d| d.tags.iter().map(|t| t.to_lowercase()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{DocumentIcon, DocumentType};

    fn doc(id: &str, title: &str, category: &str, tags: &[&str]) -> SupportDocument {
        SupportDocument {
            id: id.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            icon: DocumentIcon::File,
            content: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            doc_type: DocumentType::Markdown,
            file_url: None,
        }
    }

    fn library() -> Vec<SupportDocument> {
        vec![
            doc("wifi", "Wi-Fi Network Connections", "Network", &["network", "wifi"]),
            doc("vpn", "VPN Connection Guide", "Network", &["vpn", "network", "remote"]),
            doc("teams", "Tips on Using MS Teams", "Collaboration", &["teams", "chat"]),
        ]
    }

    fn ids(docs: Vec<&SupportDocument>) -> Vec<&str> {
        docs.into_iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let docs = library();
        assert_eq!(DocumentQuery::new().apply(&docs).len(), 3);
        assert_eq!(DocumentQuery::new().with_search("   ").apply(&docs).len(), 3);
    }

    #[test]
    fn test_search_title_and_category() {
        let docs = library();
        assert_eq!(ids(DocumentQuery::new().with_search("vpn").apply(&docs)), vec!["vpn"]);
        assert_eq!(
            ids(DocumentQuery::new().with_search("NETWORK").apply(&docs)),
            vec!["wifi", "vpn"]
        );
        assert!(DocumentQuery::new().with_search("printer").apply(&docs).is_empty());
    }

    #[test]
    fn test_tags_require_all() {
        let docs = library();
        let query = DocumentQuery::new().with_tag("network").with_tag("remote");
        assert_eq!(ids(query.apply(&docs)), vec!["vpn"]);
    }

    #[test]
    fn test_tags_ignored_when_feature_disabled() {
        let docs = library();
        let mut features = Features::default();
        features.set(Features::TAG_FILTERING, false);

        let query = DocumentQuery::new().with_tag("chat").for_features(&features);
        assert_eq!(query.apply(&docs).len(), 3);
    }

    #[test]
    fn test_all_tags_sorted_and_distinct() {
        let docs = library();
        assert_eq!(
            all_tags(&docs),
            vec!["chat", "network", "remote", "teams", "vpn", "wifi"]
        );
    }
}
