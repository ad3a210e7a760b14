//! Section extraction for the search index.
//!
//! Splits a document's markdown into article-bounded sections. An article
//! boundary is a `### Article <ref>` heading followed by a bold title line.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::{ARTICLE_SECTION_CAP, FALLBACK_SECTION_CAP};
use crate::text::{normalize, truncate_chars};
use crate::types::{Document, Section};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^### (Article \d+\w?)\s*\n\*\*([^*]+)\*\*[ \t]*$").expect("valid regex")
});

/// Lines that end an article body: any article heading or a level-1/2 heading.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BODY_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:### Article\b|#{1,2}\s)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Split a document into search sections.
///
/// Always returns at least one section: a document without article
/// boundaries yields a single section covering the whole text, keyed by
/// the document slug.
#[must_use]
pub fn extract_sections(document: &Document) -> Vec<Section> {
    let markdown = document.content_markdown.as_str();
    let mut sections = Vec::new();

    for caps in ARTICLE_BOUNDARY.captures_iter(markdown) {
        let (Some(whole), Some(reference), Some(title)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        let body_start = whole.end();
        let body_end = BODY_END
            .find_at(markdown, body_start)
            .map_or(markdown.len(), |m| m.start());
        let body = &markdown[body_start..body_end];

        let reference = reference.as_str();
        let section_title = title.as_str().trim().to_string();
        let mut content = truncate_chars(&normalize(body), ARTICLE_SECTION_CAP).to_string();
        if content.is_empty() {
            content.clone_from(&section_title);
        }

        sections.push(Section {
            id: format!(
                "{}#{}",
                document.slug,
                WHITESPACE.replace_all(&reference.to_lowercase(), "-")
            ),
            slug: document.slug.clone(),
            doc_type: document.doc_type.as_str().to_string(),
            doc_title: document.short_title.clone(),
            section: reference.to_string(),
            section_title,
            content,
        });
    }

    if sections.is_empty() {
        tracing::debug!(slug = %document.slug, "No article boundaries, using whole document");
        let mut content = truncate_chars(&normalize(markdown), FALLBACK_SECTION_CAP).to_string();
        if content.is_empty() {
            content.clone_from(&document.title);
        }
        sections.push(Section {
            id: document.slug.clone(),
            slug: document.slug.clone(),
            doc_type: document.doc_type.as_str().to_string(),
            doc_title: document.short_title.clone(),
            section: document.short_title.clone(),
            section_title: document.title.clone(),
            content,
        });
    }

    sections
}
