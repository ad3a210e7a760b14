//! Inverted full-text index with per-field BM25 scoring.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::schema::{FieldBoosts, SearchDocument, SearchField};
use super::tokenize::tokenize;
use crate::error::Result;

/// Serialized index format version.
pub const INDEX_FORMAT_VERSION: u32 = 1;

const BM25_K1: f64 = 1.5;
const BM25_B: f64 = 0.75;
/// Lower bound for IDF so very common tokens still contribute.
const IDF_FLOOR: f64 = 0.1;

/// Occurrences of a token in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Posting {
    doc: usize,
    tf: u32,
}

/// Postings and length statistics for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldIndex {
    field: SearchField,
    postings: BTreeMap<String, Vec<Posting>>,
    /// Token count per document, by document position.
    lengths: Vec<u32>,
}

impl FieldIndex {
    fn build(field: SearchField, documents: &[SearchDocument]) -> Self {
        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut lengths = Vec::with_capacity(documents.len());

        for (doc, document) in documents.iter().enumerate() {
            let tokens = tokenize(field.value(document));
            lengths.push(u32::try_from(tokens.len()).unwrap_or(u32::MAX));

            let mut counts: BTreeMap<String, u32> = BTreeMap::new();
            for token in tokens {
                *counts.entry(token).or_default() += 1;
            }
            for (token, tf) in counts {
                postings.entry(token).or_default().push(Posting { doc, tf });
            }
        }

        Self {
            field,
            postings,
            lengths,
        }
    }

    fn average_length(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        let total: u64 = self.lengths.iter().map(|&l| u64::from(l)).sum();
        total as f64 / self.lengths.len() as f64
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub document: &'a SearchDocument,
    pub score: f64,
}

/// Immutable search index, built once per run and loaded wholesale by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    version: u32,
    boosts: FieldBoosts,
    documents: Vec<SearchDocument>,
    fields: Vec<FieldIndex>,
}

impl SearchIndex {
    /// Index documents in the given order.
    #[must_use]
    pub fn build(documents: Vec<SearchDocument>, boosts: FieldBoosts) -> Self {
        let fields = SearchField::ALL
            .iter()
            .map(|&field| FieldIndex::build(field, &documents))
            .collect();

        Self {
            version: INDEX_FORMAT_VERSION,
            boosts,
            documents,
            fields,
        }
    }

    /// Parse a serialized index.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the index.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn documents(&self) -> &[SearchDocument] {
        &self.documents
    }

    #[must_use]
    pub fn boosts(&self) -> &FieldBoosts {
        &self.boosts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Rank documents for a query, best first.
    ///
    /// Each field contributes its BM25 score times the field boost. Terms
    /// defined in more than one document get the multi-source boost. Equal
    /// scores keep index order.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let tokens: BTreeSet<String> = tokenize(query).into_iter().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let total_docs = self.documents.len() as f64;
        let mut scores: HashMap<usize, f64> = HashMap::new();

        for field_index in &self.fields {
            let boost = self.boosts.boost(field_index.field);
            let avg_length = field_index.average_length();
            if avg_length == 0.0 {
                continue;
            }

            for token in &tokens {
                let Some(postings) = field_index.postings.get(token) else {
                    continue;
                };
                let df = postings.len() as f64;
                let idf = ((total_docs - df + 0.5) / (df + 0.5)).ln().max(IDF_FLOOR);

                for posting in postings {
                    let length = field_index.lengths.get(posting.doc).copied().unwrap_or(0);
                    let norm = 1.0 - BM25_B + BM25_B * (f64::from(length) / avg_length);
                    let tf = f64::from(posting.tf);
                    let score = idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * norm);
                    *scores.entry(posting.doc).or_default() += score * boost;
                }
            }
        }

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .filter_map(|(doc, score)| {
                let document = self.documents.get(doc)?;
                let score = if document.source_count > 1 {
                    score * self.boosts.multi_source
                } else {
                    score
                };
                Some((doc, score))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .take(limit)
            .filter_map(|(doc, score)| {
                self.documents
                    .get(doc)
                    .map(|document| SearchHit { document, score })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(id: &str, term: &str, section_title: &str, content: &str, sources: usize) -> SearchDocument {
        SearchDocument {
            id: id.to_string(),
            slug: "2024-1183".to_string(),
            doc_type: if term.is_empty() { "regulation" } else { "term" }.to_string(),
            term: term.to_string(),
            doc_title: "European Digital Identity Framework".to_string(),
            section: "Article 3".to_string(),
            section_title: section_title.to_string(),
            content: content.to_string(),
            source_count: sources,
        }
    }

    fn index() -> SearchIndex {
        SearchIndex::build(
            vec![
                doc("a", "", "Definitions", "a relying party uses the wallet for attestation", 0),
                doc("b", "", "Certification", "wallet units are certified by conformity assessment bodies", 0),
                doc("term-wallet", "wallet", "wallet", "a wallet is an electronic identification means", 1),
                doc("c", "", "Supervision", "supervisory bodies oversee trust services", 0),
            ],
            FieldBoosts::default(),
        )
    }

    #[test]
    fn test_term_match_outranks_content() {
        let index = index();
        let hits = index.search("wallet", 10);
        let ids: Vec<_> = hits.iter().map(|h| h.document.id.as_str()).collect();
        assert_eq!(ids[0], "term-wallet");
        assert!(ids.contains(&"a"));
        assert!(!ids.contains(&"c"));
    }

    #[test]
    fn test_multi_source_boost() {
        let index = SearchIndex::build(
            vec![
                doc("term-one", "attestation", "attestation", "an attestation", 1),
                doc("term-many", "attestation", "attestation", "an attestation", 3),
            ],
            FieldBoosts::default(),
        );
        let hits = index.search("attestation", 10);
        assert_eq!(hits[0].document.id, "term-many");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_limit_and_empty_query() {
        let index = index();
        assert_eq!(index.search("bodies", 1).len(), 1);
        assert!(index.search("  ", 10).is_empty());
        assert!(index.search("nonexistent", 10).is_empty());
    }

    #[test]
    fn test_json_roundtrip_preserves_ranking() {
        let index = index();
        let restored = SearchIndex::from_json(&index.to_json().unwrap()).unwrap();
        assert_eq!(restored, index);
        assert_eq!(restored.search("wallet", 1)[0].document.id, "term-wallet");
    }
}
