//! Registry of external (non-hosted) legal documents.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::{ExternalDocument, ExternalDocumentsFile};

/// Lookup of external documents by identifier or alias.
#[derive(Debug, Clone, Default)]
pub struct ExternalRegistry {
    documents: Vec<ExternalDocument>,
    /// Identifier or alias to index in `documents`.
    keys: HashMap<String, usize>,
}

impl ExternalRegistry {
    /// Build a registry. Later entries win when keys collide.
    #[must_use]
    pub fn new(documents: Vec<ExternalDocument>) -> Self {
        let mut keys = HashMap::new();
        for (idx, doc) in documents.iter().enumerate() {
            keys.insert(doc.id.clone(), idx);
            for alias in &doc.aliases {
                keys.insert(alias.clone(), idx);
            }
        }
        Self { documents, keys }
    }

    /// Load the registry from its YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: ExternalDocumentsFile = serde_yaml_ng::from_str(&content)?;
        Ok(Self::new(file.documents))
    }

    /// Find a document by its identifier or one of its aliases.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&ExternalDocument> {
        self.keys.get(id).and_then(|&idx| self.documents.get(idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
