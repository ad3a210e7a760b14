//! Core data types for the builder.
//!
//! Input shapes mirror the JSON/YAML files produced by the upstream content
//! and terminology extraction; derived shapes are rebuilt on every run.

use serde::{Deserialize, Serialize};

/// Kinds of documents hosted in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    /// Basic regulation (e.g. 910/2014).
    Regulation,

    /// Implementing act adopted under a regulation.
    ImplementingAct,

    /// Anything else the content build emits.
    #[serde(other)]
    Other,
}

impl DocumentType {
    /// Get the string value used in search documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regulation => "regulation",
            Self::ImplementingAct => "implementing-act",
            Self::Other => "other",
        }
    }
}

/// One entry of the document index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIndexEntry {
    pub slug: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub title: String,
    pub short_title: String,
}

/// A hosted legal document. Immutable input to a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub slug: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub title: String,
    pub short_title: String,
    /// Body in markdown, front matter already stripped.
    #[serde(default)]
    pub content_markdown: String,
}

impl Document {
    /// Create a document.
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        doc_type: DocumentType,
        title: impl Into<String>,
        short_title: impl Into<String>,
        content_markdown: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            doc_type,
            title: title.into(),
            short_title: short_title.into(),
            content_markdown: content_markdown.into(),
        }
    }

    /// Identifier in `NUMBER/YEAR` form used by citations (`910-2014` → `910/2014`).
    #[must_use]
    pub fn hosted_id(&self) -> String {
        self.slug.replace('-', "/")
    }
}

/// One search-indexable unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub doc_title: String,
    pub section: String,
    pub section_title: String,
    pub content: String,
}

/// One definition backing a terminology entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSource {
    pub definition: String,
    pub document_id: String,
    pub document_title: String,
    #[serde(default)]
    pub document_category: String,
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub article_number: String,
}

/// A defined term with all its sources, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub sources: Vec<TermSource>,
}

/// Terminology file: either a bare array or the `{ "terms": [...] }` wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TerminologyFile {
    Records(Vec<TermRecord>),
    Wrapped { terms: Vec<TermRecord> },
}

impl TerminologyFile {
    #[must_use]
    pub fn into_records(self) -> Vec<TermRecord> {
        match self {
            Self::Records(records) | Self::Wrapped { terms: records } => records,
        }
    }
}

/// A legal document that is cited but not hosted in the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDocument {
    /// `YEAR/NUMBER` or `NUMBER/YEAR` as cited (e.g. "2022/1925").
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub celex: String,
    pub title: String,
    #[serde(default, alias = "short")]
    pub short_name: String,
}

/// External document registry file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalDocumentsFile {
    #[serde(default)]
    pub documents: Vec<ExternalDocument>,
}

/// Preview for one anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    pub title: String,
    pub excerpt: String,
}

/// Kind of addressable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Article,
    Paragraph,
    Point,
    Subpoint,
    Recital,
    AnnexSection,
}

impl UnitKind {
    /// CSS class marking the unit in rendered HTML.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Article => "linkable-article",
            Self::Paragraph => "linkable-paragraph",
            Self::Point => "linkable-point",
            Self::Subpoint => "linkable-subpoint",
            Self::Recital => "linkable-recital",
            Self::AnnexSection => "linkable-annex",
        }
    }
}

/// An addressable unit of a document after annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressableUnit {
    pub id: String,
    pub kind: UnitKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Enclosing article for paragraphs, points and subpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_roundtrip_strings() {
        let parsed: DocumentType = serde_json::from_str("\"implementing-act\"").unwrap();
        assert_eq!(parsed, DocumentType::ImplementingAct);
        assert_eq!(parsed.as_str(), "implementing-act");

        let unknown: DocumentType = serde_json::from_str("\"guidance\"").unwrap();
        assert_eq!(unknown, DocumentType::Other);
    }

    #[test]
    fn test_hosted_id() {
        let doc = Document::new("910-2014", DocumentType::Regulation, "t", "s", "");
        assert_eq!(doc.hosted_id(), "910/2014");
    }

    #[test]
    fn test_terminology_file_both_shapes() {
        let bare = r#"[{"id":"pid","term":"PID","sources":[]}]"#;
        let wrapped = r#"{"version":"1.0","terms":[{"id":"pid","term":"PID"}]}"#;

        let a: TerminologyFile = serde_json::from_str(bare).unwrap();
        let b: TerminologyFile = serde_json::from_str(wrapped).unwrap();
        assert_eq!(a.into_records().len(), 1);
        assert_eq!(b.into_records()[0].term, "PID");
    }

    #[test]
    fn test_external_document_short_alias() {
        let yaml = "documents:\n  - id: 2022/1925\n    celex: 32022R1925\n    title: Digital Markets Act\n    short: DMA\n";
        let file: ExternalDocumentsFile = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(file.documents[0].short_name, "DMA");
        assert!(file.documents[0].aliases.is_empty());
    }
}
