//! Configuration constants and validation functions for the builder.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{BuilderError, Result};

/// Excerpts shorter than this are not emitted.
pub const MIN_EXCERPT_LENGTH: usize = 50;

/// Excerpts longer than this are truncated at a word boundary.
pub const MAX_EXCERPT_LENGTH: usize = 300;

/// A truncation space must lie past this fraction of [`MAX_EXCERPT_LENGTH`],
/// otherwise the excerpt is cut hard.
pub const TRUNCATION_FLOOR: f64 = 0.7;

/// Appended to every truncated excerpt.
pub const ELLIPSIS: &str = "...";

/// Character cap for the content of one article section.
pub const ARTICLE_SECTION_CAP: usize = 2000;

/// Character cap for the whole-document fallback section.
pub const FALLBACK_SECTION_CAP: usize = 5000;

/// Minimum number of terminology records for a build to produce an index.
///
/// Below this the upstream terminology extraction is assumed broken.
pub const MIN_TERMINOLOGY_RECORDS: usize = 50;

/// Maximum length of a slugified heading identifier.
pub const HEADING_SLUG_MAX_LENGTH: usize = 50;

/// EUR-Lex viewer URL; the CELEX number is appended.
pub const EURLEX_BASE_URL: &str = "https://eur-lex.europa.eu/legal-content/EN/TXT/HTML/?uri=CELEX:";

/// Relevance weight of the `term` field.
pub const BOOST_TERM: f64 = 10.0;

/// Relevance weight of the `sectionTitle` field.
pub const BOOST_SECTION_TITLE: f64 = 3.0;

/// Relevance weight of the `section` field.
pub const BOOST_SECTION: f64 = 2.0;

/// Relevance weight of the `docTitle` field.
pub const BOOST_DOC_TITLE: f64 = 1.5;

/// Relevance weight of the `content` field.
pub const BOOST_CONTENT: f64 = 1.0;

/// Score multiplier for terms defined in more than one source.
pub const MULTI_SOURCE_BOOST: f64 = 1.5;

/// Default number of hits returned by a query.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Input: list of all documents to process.
pub const DOCUMENT_INDEX_FILE: &str = "regulations-index.json";

/// Input: directory holding one `<slug>.json` per document.
pub const DOCUMENTS_DIR: &str = "regulations";

/// Input: terminology dataset.
pub const TERMINOLOGY_FILE: &str = "terminology.json";

/// Input: registry of external (non-hosted) documents.
pub const EXTERNAL_DOCUMENTS_FILE: &str = "external-documents.yaml";

/// Output: directory of rendered, annotated HTML per document.
pub const CONTENT_OUTPUT_DIR: &str = "content";

/// Output: excerpt map keyed by slug, then anchor ID.
pub const EXCERPTS_OUTPUT_FILE: &str = "article-excerpts.json";

/// Output: all search sections.
pub const SECTIONS_OUTPUT_FILE: &str = "sections.json";

/// Output: addressable units of every document, keyed by slug.
pub const UNITS_OUTPUT_FILE: &str = "addressable-units.json";

/// Output: serialized search index.
pub const SEARCH_INDEX_OUTPUT_FILE: &str = "search-index.json";

/// Slug pattern: lowercase alphanumerics and dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid regex"));

/// Validate a document slug.
///
/// Slugs become file names, so anything outside `[a-z0-9-]` is rejected.
///
/// # Examples
/// ```
/// use regdocs_builder::config::validate_slug;
///
/// assert!(validate_slug("2024-2977").is_ok());
/// assert!(validate_slug("../secrets").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<()> {
    if SLUG_PATTERN.is_match(slug) {
        Ok(())
    } else {
        Err(BuilderError::InvalidSlug(slug.to_string()))
    }
}

/// Build the EUR-Lex URL for a CELEX number without anchor.
#[must_use]
pub fn eurlex_url(celex: &str) -> String {
    format!("{EURLEX_BASE_URL}{celex}")
}

/// Resolved input and output locations for one build.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// Directory holding the inputs.
    pub data_dir: PathBuf,
    /// Directory receiving the outputs.
    pub output_dir: PathBuf,
}

impl BuildPaths {
    /// Create paths; outputs default to the data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let output_dir = output_dir.unwrap_or_else(|| data_dir.clone());
        Self {
            data_dir,
            output_dir,
        }
    }

    #[must_use]
    pub fn document_index(&self) -> PathBuf {
        self.data_dir.join(DOCUMENT_INDEX_FILE)
    }

    #[must_use]
    pub fn document(&self, slug: &str) -> PathBuf {
        self.data_dir.join(DOCUMENTS_DIR).join(format!("{slug}.json"))
    }

    #[must_use]
    pub fn terminology(&self) -> PathBuf {
        self.data_dir.join(TERMINOLOGY_FILE)
    }

    #[must_use]
    pub fn external_documents(&self) -> PathBuf {
        self.data_dir.join(EXTERNAL_DOCUMENTS_FILE)
    }

    #[must_use]
    pub fn content_output(&self, slug: &str) -> PathBuf {
        self.output_dir
            .join(CONTENT_OUTPUT_DIR)
            .join(format!("{slug}.html"))
    }

    #[must_use]
    pub fn excerpts_output(&self) -> PathBuf {
        self.output_dir.join(EXCERPTS_OUTPUT_FILE)
    }

    #[must_use]
    pub fn sections_output(&self) -> PathBuf {
        self.output_dir.join(SECTIONS_OUTPUT_FILE)
    }

    #[must_use]
    pub fn units_output(&self) -> PathBuf {
        self.output_dir.join(UNITS_OUTPUT_FILE)
    }

    #[must_use]
    pub fn search_index_output(&self) -> PathBuf {
        self.output_dir.join(SEARCH_INDEX_OUTPUT_FILE)
    }
}

/// Check that a required input exists before any processing starts.
pub fn require_input(what: &'static str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BuilderError::MissingInput {
            what,
            path: path.to_path_buf(),
        })
    }
}
