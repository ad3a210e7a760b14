//! RegDocs Builder - Anchor, link and index EU legal documents.
//!
//! This crate turns regulation markdown into addressable content: every
//! article, paragraph, point, subpoint, recital and annex paragraph gets a
//! stable anchor. From that model it derives preview excerpts, deep links to
//! external legal documents on EUR-Lex, links from defined terms to their
//! definitions, and a weighted full-text search index.
//!
//! # Example
//!
//! ```
//! use regdocs_builder::annotate::Annotator;
//! use regdocs_builder::content::{assign_heading_ids, parse_markdown, render_html};
//!
//! let mut tree = parse_markdown("### Article 5b\n\n3. Third paragraph\n");
//! assign_heading_ids(&mut tree);
//! Annotator::default().annotate(&mut tree);
//!
//! assert!(render_html(&tree).contains("id=\"article-5b-para-3\""));
//! ```
//!
//! # Architecture
//!
//! The builder is organized into several modules:
//!
//! - [`config`]: Configuration constants, paths and validation
//! - [`types`]: Core data types (Document, Section, TermRecord, etc.)
//! - [`error`]: Error types and Result alias
//! - [`text`]: Text normalization and truncation
//! - [`content`]: Markdown parsing, heading identifiers and HTML rendering
//! - [`annotate`]: Document structure annotation with swappable matchers
//! - [`excerpts`]: Anchor preview extraction
//! - [`sections`]: Article-bounded search sections
//! - [`linker`]: Cross-references to external legal documents and defined terms
//! - [`search`]: Search index construction and querying
//! - [`cli`]: Command-line interface
//! - [`pipeline`]: Build pipeline tying everything together

pub mod annotate;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod excerpts;
pub mod linker;
pub mod pipeline;
pub mod search;
pub mod sections;
pub mod text;
pub mod types;

// Re-export main functions
pub use pipeline::{build, build_excerpts, process_document, BuildReport};

// Re-export commonly used items
pub use annotate::{create_eu_matcher_registry, Annotator};
pub use error::{BuilderError, Result};
pub use text::normalize;
pub use types::{Document, DocumentType, Excerpt, Section, TermRecord};
