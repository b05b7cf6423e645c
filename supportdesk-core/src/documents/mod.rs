//! Support documents and collection manifests
//!
//! A collection's `manifest.json` lists [`ManifestItem`]s. The client turns
//! each item into a [`SupportDocument`]: textual bodies are fetched and run
//! through [`Placeholders`], other types keep only their URL.

mod fallback;
mod filter;
mod placeholders;

pub use fallback::fallback_documents;
pub use filter::{all_tags, DocumentQuery};
pub use placeholders::Placeholders;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Features;

/// Kind of document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Markdown,
    Pdf,
    Image,
    Word,
}

impl DocumentType {
    /// Detect the type from a file name's extension.
    ///
    /// Unknown or missing extensions are treated as markdown.
    pub fn detect(file: &str) -> Self {
        let extension = file
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => DocumentType::Pdf,
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" => DocumentType::Image,
            "doc" | "docx" => DocumentType::Word,
            _ => DocumentType::Markdown,
        }
    }

    /// Textual documents have their body fetched and substituted.
    pub fn is_textual(self) -> bool {
        matches!(self, DocumentType::Markdown)
    }

    /// Feature flag gating this type, if any.
    pub fn feature_flag(self) -> Option<&'static str> {
        match self {
            DocumentType::Markdown => None,
            DocumentType::Pdf => Some(Features::PDF_DOCUMENTS),
            DocumentType::Word => Some(Features::WORD_DOCUMENTS),
            DocumentType::Image => Some(Features::IMAGE_DOCUMENTS),
        }
    }

    /// Whether the configuration's features allow this type.
    pub fn is_allowed(self, features: &Features) -> bool {
        self.feature_flag()
            .map(|flag| features.is_enabled(flag))
            .unwrap_or(true)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Markdown => "markdown",
            DocumentType::Pdf => "pdf",
            DocumentType::Image => "image",
            DocumentType::Word => "word",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tile icon for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentIcon {
    Wifi,
    Teams,
    Email,
    Security,
    Vpn,
    Printer,
    Phone,
    Laptop,
    File,
    Image,
}

impl DocumentIcon {
    /// Parse a manifest icon name; unknown names map to [`DocumentIcon::File`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "wifi" => DocumentIcon::Wifi,
            "teams" => DocumentIcon::Teams,
            "email" => DocumentIcon::Email,
            "security" => DocumentIcon::Security,
            "vpn" => DocumentIcon::Vpn,
            "printer" => DocumentIcon::Printer,
            "phone" => DocumentIcon::Phone,
            "laptop" => DocumentIcon::Laptop,
            "image" => DocumentIcon::Image,
            _ => DocumentIcon::File,
        }
    }
}

/// One entry of a collection's `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub icon: String,
    /// File name, relative to the manifest's directory
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Explicit type; detected from `file` when absent
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
}

impl ManifestItem {
    pub fn document_type(&self) -> DocumentType {
        self.doc_type
            .unwrap_or_else(|| DocumentType::detect(&self.file))
    }
}

/// A document ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportDocument {
    pub id: String,
    pub title: String,
    pub category: String,
    pub icon: DocumentIcon,
    /// Substituted body for textual documents, a short stub otherwise
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl SupportDocument {
    /// Body shown for documents whose content is rendered from `file_url`.
    pub fn stub_content(doc_type: DocumentType) -> String {
        format!("This is a {} file. View below.", doc_type)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Resolve a manifest entry's file against the manifest location.
///
/// Absolute paths and URLs are returned untouched; relative names land in
/// the manifest's directory.
pub fn resolve_file_url(manifest_path: &str, file: &str) -> String {
    if file.starts_with('/') || file.contains("://") {
        return file.to_string();
    }

    match manifest_path.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}", dir, file),
        None => file.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_document_type() {
        assert_eq!(DocumentType::detect("wifi.md"), DocumentType::Markdown);
        assert_eq!(DocumentType::detect("README.MARKDOWN"), DocumentType::Markdown);
        assert_eq!(DocumentType::detect("policy.PDF"), DocumentType::Pdf);
        assert_eq!(DocumentType::detect("diagram.svg"), DocumentType::Image);
        assert_eq!(DocumentType::detect("photo.JPEG"), DocumentType::Image);
        assert_eq!(DocumentType::detect("form.docx"), DocumentType::Word);
        assert_eq!(DocumentType::detect("notes.txt"), DocumentType::Markdown);
        assert_eq!(DocumentType::detect("noextension"), DocumentType::Markdown);
    }

    #[test]
    fn test_explicit_type_wins() {
        let item: ManifestItem = serde_json::from_str(
            r#"{"id":"a","title":"A","category":"C","icon":"file","file":"a.bin","type":"pdf"}"#,
        )
        .unwrap();
        assert_eq!(item.document_type(), DocumentType::Pdf);
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_type_gating() {
        let mut features = Features::default();
        features.set(Features::PDF_DOCUMENTS, true);
        features.set(Features::WORD_DOCUMENTS, false);

        assert!(DocumentType::Markdown.is_allowed(&features));
        assert!(DocumentType::Pdf.is_allowed(&features));
        assert!(!DocumentType::Word.is_allowed(&features));
        assert!(!DocumentType::Image.is_allowed(&features));
    }

    #[test]
    fn test_icon_fallback() {
        assert_eq!(DocumentIcon::from_name("vpn"), DocumentIcon::Vpn);
        assert_eq!(DocumentIcon::from_name("Printer"), DocumentIcon::Printer);
        assert_eq!(DocumentIcon::from_name("rocket"), DocumentIcon::File);
    }

    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_file_url("/documents/manifest.json", "wifi.md"),
            "/documents/wifi.md"
        );
        assert_eq!(
            resolve_file_url("public/docs/manifest.json", "guides/vpn.md"),
            "public/docs/guides/vpn.md"
        );
        assert_eq!(
            resolve_file_url("/documents/manifest.json", "/shared/logo.png"),
            "/shared/logo.png"
        );
        assert_eq!(
            resolve_file_url("manifest.json", "https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
        assert_eq!(resolve_file_url("manifest.json", "a.md"), "a.md");
    }

    #[test]
    fn test_stub_content() {
        assert_eq!(
            SupportDocument::stub_content(DocumentType::Pdf),
            "This is a pdf file. View below."
        );
    }
}
