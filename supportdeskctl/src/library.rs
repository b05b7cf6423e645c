//! Document collections
//!
//! Each collection named in the configuration points at a manifest. Items
//! are loaded one by one: a document that fails to load is dropped and
//! logged without affecting its siblings. If nothing at all could be
//! loaded, the bundled fallback guides take the library's place.

use serde::Serialize;
use supportdesk_core::{
    all_tags, fallback_documents, resolve_file_url, Configuration, DocumentIcon, DocumentQuery,
    ManifestItem, Placeholders, Result, SupportDeskError, SupportDocument,
};
use tracing::{debug, info, warn};

use crate::source::DocumentSource;

/// Name given to the bundled collection.
pub const FALLBACK_COLLECTION: &str = "Support Documents";

/// Documents of one collection, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedCollection {
    pub name: String,
    pub path: String,
    pub documents: Vec<SupportDocument>,
}

/// Outcome of loading one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub name: String,
    pub path: String,
    pub loaded: usize,
    /// Items that failed to load
    pub dropped: usize,
    /// Items whose type is disabled by a feature flag
    pub skipped: usize,
    /// Why the manifest itself could not be loaded
    pub error: Option<String>,
}

/// Per-collection counts for a whole library load.
///
/// The library never turns dropped items into an error; callers may use
/// these counts to decide whether to tell the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryReport {
    pub collections: Vec<CollectionReport>,
    pub used_fallback: bool,
}

impl LibraryReport {
    pub fn total_loaded(&self) -> usize {
        self.collections.iter().map(|c| c.loaded).sum()
    }

    pub fn total_dropped(&self) -> usize {
        self.collections.iter().map(|c| c.dropped).sum()
    }

    pub fn failed_collections(&self) -> impl Iterator<Item = &CollectionReport> {
        self.collections.iter().filter(|c| c.error.is_some())
    }

    pub fn has_failures(&self) -> bool {
        self.total_dropped() > 0 || self.failed_collections().next().is_some()
    }
}

/// All documents available to the viewer.
#[derive(Debug, Clone, Default)]
pub struct DocumentLibrary {
    collections: Vec<LoadedCollection>,
    report: LibraryReport,
}

impl DocumentLibrary {
    pub fn collections(&self) -> &[LoadedCollection] {
        &self.collections
    }

    pub fn report(&self) -> &LibraryReport {
        &self.report
    }

    pub fn documents(&self) -> impl Iterator<Item = &SupportDocument> {
        self.collections.iter().flat_map(|c| c.documents.iter())
    }

    pub fn len(&self) -> usize {
        self.documents().count()
    }

    pub fn is_empty(&self) -> bool {
        self.documents().next().is_none()
    }

    pub fn find(&self, id: &str) -> Option<&SupportDocument> {
        self.documents().find(|d| d.id == id)
    }

    pub fn search(&self, query: &DocumentQuery) -> Vec<&SupportDocument> {
        query.apply(self.documents())
    }

    /// Distinct tags across the library.
    pub fn tags(&self) -> Vec<String> {
        all_tags(self.documents())
    }
}

/// Load every collection of `config`, in position order.
pub async fn load_library(
    source: &dyn DocumentSource,
    config: &Configuration,
) -> DocumentLibrary {
    let placeholders = Placeholders::from_config(config);
    let mut library = DocumentLibrary::default();

    for collection in config.ordered_collections() {
        let mut report = CollectionReport {
            name: collection.name.clone(),
            path: collection.path.clone(),
            ..Default::default()
        };

        let items = match source.fetch_manifest(&collection.path).await {
            Ok(items) => items,
            Err(e) => {
                warn!(collection = %collection.name, error = %e, "failed to load manifest");
                report.error = Some(e.to_string());
                library.report.collections.push(report);
                continue;
            }
        };

        let mut documents = Vec::with_capacity(items.len());
        for (index, entry) in items.into_iter().enumerate() {
            let item: ManifestItem = match serde_json::from_value(entry) {
                Ok(item) => item,
                Err(e) => {
                    warn!(
                        collection = %collection.name,
                        index,
                        error = %e,
                        "dropping malformed manifest entry"
                    );
                    report.dropped += 1;
                    continue;
                }
            };

            let doc_type = item.document_type();
            if !doc_type.is_allowed(&config.features) {
                debug!(id = %item.id, %doc_type, "document type disabled, skipping");
                report.skipped += 1;
                continue;
            }

            match load_document(source, &placeholders, &collection.path, &item).await {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!(collection = %collection.name, error = %e, "dropping document");
                    report.dropped += 1;
                }
            }
        }

        report.loaded = documents.len();
        debug!(
            collection = %collection.name,
            loaded = report.loaded,
            dropped = report.dropped,
            skipped = report.skipped,
            "loaded collection"
        );
        library.report.collections.push(report);
        library.collections.push(LoadedCollection {
            name: collection.name.clone(),
            path: collection.path.clone(),
            documents,
        });
    }

    if library.is_empty() {
        info!("no documents loaded, using bundled documents");
        library.collections = vec![LoadedCollection {
            name: FALLBACK_COLLECTION.to_string(),
            path: String::new(),
            documents: fallback_documents(config),
        }];
        library.report.used_fallback = true;
    }

    library
}

/// Turn one manifest item into a document.
///
/// Textual bodies are fetched and substituted; other types only carry
/// their resolved URL.
async fn load_document(
    source: &dyn DocumentSource,
    placeholders: &Placeholders,
    manifest_path: &str,
    item: &ManifestItem,
) -> Result<SupportDocument> {
    if item.id.trim().is_empty() {
        return Err(SupportDeskError::DocumentLoad {
            id: item.file.clone(),
            reason: "manifest entry has no id".to_string(),
        });
    }

    let doc_type = item.document_type();
    let url = resolve_file_url(manifest_path, &item.file);

    let (content, file_url) = if doc_type.is_textual() {
        let body = source
            .fetch_text(&url)
            .await
            .map_err(|e| SupportDeskError::DocumentLoad {
                id: item.id.clone(),
                reason: e.to_string(),
            })?;
        (placeholders.apply(&body), None)
    } else {
        (SupportDocument::stub_content(doc_type), Some(url))
    };

    Ok(SupportDocument {
        id: item.id.clone(),
        title: placeholders.apply(&item.title),
        category: item.category.clone(),
        icon: DocumentIcon::from_name(&item.icon),
        content,
        tags: item.tags.clone(),
        doc_type,
        file_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_config;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use supportdesk_core::DocumentType;

    /// In-memory asset tree keyed by path.
    #[derive(Default)]
    struct FakeAssets {
        manifests: HashMap<String, Vec<Value>>,
        texts: HashMap<String, String>,
    }

    #[async_trait]
    impl DocumentSource for FakeAssets {
        async fn fetch_manifest(&self, path: &str) -> Result<Vec<Value>> {
            self.manifests
                .get(path)
                .cloned()
                .ok_or_else(|| SupportDeskError::fetch(path, "not found (404)"))
        }

        async fn fetch_text(&self, path: &str) -> Result<String> {
            self.texts
                .get(path)
                .cloned()
                .ok_or_else(|| SupportDeskError::fetch(path, "not found (404)"))
        }
    }

    fn item(id: &str, file: &str, tags: &[&str]) -> Value {
        json!({
            "id": id,
            "title": format!("{} for {{companyName}}", id),
            "category": "General",
            "icon": "file",
            "file": file,
            "tags": tags,
        })
    }

    fn config_with(collections: Value) -> Configuration {
        let mut value = sample_config();
        value["documents"] = collections;
        value["features"]["imageDocuments"] = json!(false);
        Configuration::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_bad_item_does_not_abort_collection() {
        let mut assets = FakeAssets::default();
        assets.manifests.insert(
            "/docs/manifest.json".to_string(),
            vec![
                item("wifi", "wifi.md", &["network"]),
                item("missing", "missing.md", &[]),
                item("policy", "policy.pdf", &["security"]),
                item("diagram", "diagram.png", &[]),
            ],
        );
        assets.texts.insert(
            "/docs/wifi.md".to_string(),
            "Connect to {companyName.toUpperCase()}-CORP".to_string(),
        );
        let config = config_with(json!([{ "name": "Docs", "path": "/docs/manifest.json" }]));

        let library = load_library(&assets, &config).await;

        let ids: Vec<&str> = library.documents().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["wifi", "policy"]);

        let wifi = library.find("wifi").unwrap();
        assert_eq!(wifi.content, "Connect to ACME CORPORATION-CORP");
        assert_eq!(wifi.title, "wifi for Acme Corporation");
        assert!(wifi.file_url.is_none());

        let policy = library.find("policy").unwrap();
        assert_eq!(policy.doc_type, DocumentType::Pdf);
        assert_eq!(policy.file_url.as_deref(), Some("/docs/policy.pdf"));
        assert_eq!(policy.content, "This is a pdf file. View below.");

        let report = &library.report().collections[0];
        assert_eq!((report.loaded, report.dropped, report.skipped), (2, 1, 1));
        assert!(!library.report().used_fallback);
        assert!(library.report().has_failures());
    }

    #[tokio::test]
    async fn test_malformed_entry_is_dropped() {
        let mut assets = FakeAssets::default();
        assets.manifests.insert(
            "/docs/manifest.json".to_string(),
            vec![
                item("first", "first.pdf", &[]),
                json!({ "id": "no-category", "title": "Broken", "icon": "file", "file": "x.pdf" }),
                json!("not an object"),
                item("last", "last.pdf", &[]),
            ],
        );
        let config = config_with(json!([{ "name": "Docs", "path": "/docs/manifest.json" }]));

        let library = load_library(&assets, &config).await;

        let ids: Vec<&str> = library.documents().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "last"]);
        let report = &library.report().collections[0];
        assert_eq!((report.loaded, report.dropped), (2, 2));
        assert!(report.error.is_none());
        assert!(!library.report().used_fallback);
    }

    #[tokio::test]
    async fn test_collections_follow_position() {
        let mut assets = FakeAssets::default();
        for dir in ["a", "b", "c"] {
            assets.manifests.insert(
                format!("/{}/manifest.json", dir),
                vec![item(dir, "doc.pdf", &[])],
            );
        }
        let config = config_with(json!([
            { "name": "A", "path": "/a/manifest.json" },
            { "name": "B", "path": "/b/manifest.json", "position": 2 },
            { "name": "C", "path": "/c/manifest.json", "position": 1 }
        ]));

        let library = load_library(&assets, &config).await;

        let names: Vec<&str> = library.collections().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_manifest_failure_falls_back_to_bundled_documents() {
        let assets = FakeAssets::default();
        let config = config_with(json!([{ "name": "Docs", "path": "/docs/manifest.json" }]));

        let library = load_library(&assets, &config).await;

        assert!(library.report().used_fallback);
        assert_eq!(library.report().failed_collections().count(), 1);
        assert_eq!(library.collections()[0].name, FALLBACK_COLLECTION);
        assert_eq!(library.len(), 5);
        assert!(library.find("vpn-setup").is_some());
    }

    #[tokio::test]
    async fn test_one_failed_manifest_keeps_the_others() {
        let mut assets = FakeAssets::default();
        assets.manifests.insert(
            "/good/manifest.json".to_string(),
            vec![item("form", "form.docx", &[])],
        );
        let config = config_with(json!([
            { "name": "Broken", "path": "/broken/manifest.json" },
            { "name": "Good", "path": "/good/manifest.json" }
        ]));

        let library = load_library(&assets, &config).await;

        assert!(!library.report().used_fallback);
        assert_eq!(library.len(), 1);
        assert_eq!(library.report().total_loaded(), 1);
    }

    #[tokio::test]
    async fn test_search_and_tags() {
        let mut assets = FakeAssets::default();
        assets.manifests.insert(
            "/docs/manifest.json".to_string(),
            vec![
                item("vpn", "vpn.pdf", &["Network", "remote"]),
                item("wifi", "wifi.pdf", &["network"]),
            ],
        );
        let config = config_with(json!([{ "name": "Docs", "path": "/docs/manifest.json" }]));
        let library = load_library(&assets, &config).await;

        assert_eq!(library.tags(), vec!["network", "remote"]);

        let query = DocumentQuery::new().with_tag("network").with_tag("remote");
        let found: Vec<&str> = library
            .search(&query)
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(found, vec!["vpn"]);

        let query = DocumentQuery::new().with_search("WIFI");
        assert_eq!(library.search(&query).len(), 1);
    }
}
