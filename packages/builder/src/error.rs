//! Error types for the builder.
//!
//! Only pipeline-level preconditions are errors. Anomalies inside a single
//! document (unmatched markers, lists outside an article, unknown citations)
//! are absorbed where they occur and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the builder library.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Document slug that cannot be used as a file name.
    #[error("Invalid document slug: '{0}'. Expected lowercase letters, digits and dashes (e.g., 2024-2977)")]
    InvalidSlug(String),

    /// A required input file does not exist.
    #[error("Missing required input ({what}): {}", .path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// Terminology dataset is too small to be trusted.
    #[error("Terminology dataset has {found} records, at least {minimum} required; refusing to write a search index")]
    TerminologyThreshold { found: usize, minimum: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON processing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, BuilderError>;
