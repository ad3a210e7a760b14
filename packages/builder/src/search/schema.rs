//! Search document schema and field weighting.

use serde::{Deserialize, Serialize};

use crate::config::{
    BOOST_CONTENT, BOOST_DOC_TITLE, BOOST_SECTION, BOOST_SECTION_TITLE, BOOST_TERM,
    MULTI_SOURCE_BOOST,
};
use crate::types::{Section, TermRecord};

/// Document type of terminology entries.
pub const TERM_TYPE: &str = "term";

/// The unit inserted into the search index: a document section or a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Defined term; empty for sections.
    #[serde(default)]
    pub term: String,
    pub doc_title: String,
    pub section: String,
    pub section_title: String,
    pub content: String,
    /// Number of documents defining the term; 0 for sections.
    #[serde(default)]
    pub source_count: usize,
}

impl From<&Section> for SearchDocument {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            slug: section.slug.clone(),
            doc_type: section.doc_type.clone(),
            term: String::new(),
            doc_title: section.doc_title.clone(),
            section: section.section.clone(),
            section_title: section.section_title.clone(),
            content: section.content.clone(),
            source_count: 0,
        }
    }
}

impl From<&TermRecord> for SearchDocument {
    /// Merge a term's sources: the first source locates the term, every
    /// definition goes into the content in display order.
    fn from(record: &TermRecord) -> Self {
        let primary = record.sources.first();
        let section = primary
            .map(|s| {
                if s.article_number.is_empty() {
                    s.article_id.clone()
                } else {
                    s.article_number.clone()
                }
            })
            .unwrap_or_default();

        Self {
            id: format!("term-{}", record.id),
            slug: primary.map(|s| s.document_id.clone()).unwrap_or_default(),
            doc_type: TERM_TYPE.to_string(),
            term: record.term.clone(),
            doc_title: primary.map(|s| s.document_title.clone()).unwrap_or_default(),
            section,
            section_title: record.term.clone(),
            content: record
                .sources
                .iter()
                .map(|s| s.definition.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            source_count: record.sources.len(),
        }
    }
}

/// Indexed text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Term,
    SectionTitle,
    Section,
    DocTitle,
    Content,
}

impl SearchField {
    pub const ALL: [Self; 5] = [
        Self::Term,
        Self::SectionTitle,
        Self::Section,
        Self::DocTitle,
        Self::Content,
    ];

    /// Text of this field in a document.
    #[must_use]
    pub fn value<'a>(&self, doc: &'a SearchDocument) -> &'a str {
        match self {
            Self::Term => &doc.term,
            Self::SectionTitle => &doc.section_title,
            Self::Section => &doc.section,
            Self::DocTitle => &doc.doc_title,
            Self::Content => &doc.content,
        }
    }
}

/// Relevance weights, stored with the index so clients rank the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBoosts {
    pub term: f64,
    pub section_title: f64,
    pub section: f64,
    pub doc_title: f64,
    pub content: f64,
    /// Multiplier for terms defined in more than one document.
    pub multi_source: f64,
}

impl FieldBoosts {
    #[must_use]
    pub fn boost(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Term => self.term,
            SearchField::SectionTitle => self.section_title,
            SearchField::Section => self.section,
            SearchField::DocTitle => self.doc_title,
            SearchField::Content => self.content,
        }
    }
}

impl Default for FieldBoosts {
    fn default() -> Self {
        Self {
            term: BOOST_TERM,
            section_title: BOOST_SECTION_TITLE,
            section: BOOST_SECTION,
            doc_title: BOOST_DOC_TITLE,
            content: BOOST_CONTENT,
            multi_source: MULTI_SOURCE_BOOST,
        }
    }
}
