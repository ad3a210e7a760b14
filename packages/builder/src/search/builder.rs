//! Search index construction from sections and terminology.

use super::index::SearchIndex;
use super::schema::{FieldBoosts, SearchDocument};
use crate::config::MIN_TERMINOLOGY_RECORDS;
use crate::error::{BuilderError, Result};
use crate::types::{Section, TermRecord};

/// Refuse terminology datasets below the minimum size.
///
/// A short dataset means the upstream extraction broke; shipping an index
/// built from it would silently drop most term lookups.
pub fn check_terminology(records: &[TermRecord]) -> Result<()> {
    if records.len() < MIN_TERMINOLOGY_RECORDS {
        return Err(BuilderError::TerminologyThreshold {
            found: records.len(),
            minimum: MIN_TERMINOLOGY_RECORDS,
        });
    }
    Ok(())
}

/// Build the search index: sections first, then one document per term.
pub fn build_search_index(sections: &[Section], terms: &[TermRecord]) -> Result<SearchIndex> {
    check_terminology(terms)?;

    let documents: Vec<SearchDocument> = sections
        .iter()
        .map(SearchDocument::from)
        .chain(terms.iter().map(SearchDocument::from))
        .collect();

    tracing::info!(
        sections = sections.len(),
        terms = terms.len(),
        "Building search index"
    );
    Ok(SearchIndex::build(documents, FieldBoosts::default()))
}
