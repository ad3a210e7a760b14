//! Cross-reference linking to external legal documents and defined terms.
//!
//! Citations of regulations and directives that are not hosted locally are
//! rewritten into deep links to EUR-Lex. Headings, code, and existing links
//! are left alone. [`TermLinker`] does the same for defined terms.

mod citation;
mod registry;
mod terms;

pub use citation::{find_citations, Citation};
pub use registry::ExternalRegistry;
pub use terms::TermLinker;

use std::collections::HashSet;

use crate::content::{Block, ContentTree, ExternalLink, Inline};

/// Rewrites external citations in text and content trees.
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceLinker {
    registry: ExternalRegistry,
    /// Identifiers of locally hosted documents (`910/2014`).
    hosted: HashSet<String>,
}

impl CrossReferenceLinker {
    /// Create a linker.
    #[must_use]
    pub fn new(registry: ExternalRegistry, hosted: impl IntoIterator<Item = String>) -> Self {
        Self {
            registry,
            hosted: hosted.into_iter().collect(),
        }
    }

    /// Split a text into plain text and external links.
    ///
    /// Citations of hosted documents or of documents missing from the
    /// registry stay plain text. The link label is the matched text as is.
    #[must_use]
    pub fn link_text(&self, text: &str) -> Vec<Inline> {
        let mut parts = Vec::new();
        let mut last = 0;

        for citation in find_citations(text) {
            if self.hosted.contains(&citation.doc_id) {
                continue;
            }
            let Some(doc) = self.registry.lookup(&citation.doc_id) else {
                tracing::trace!(doc_id = %citation.doc_id, "Citation not in external registry");
                continue;
            };

            if citation.range.start > last {
                parts.push(Inline::Text(text[last..citation.range.start].to_string()));
            }
            parts.push(Inline::ExternalLink(ExternalLink {
                href: citation.target(&doc.celex),
                label: text[citation.range.clone()].to_string(),
                doc_id: doc.id.clone(),
                short_name: doc.short_name.clone(),
                title: doc.title.clone(),
            }));
            last = citation.range.end;
        }

        if last < text.len() {
            parts.push(Inline::Text(text[last..].to_string()));
        }
        parts
    }

    /// Rewrite citations throughout a tree. Returns the number of links made.
    pub fn link_tree(&self, tree: &mut ContentTree) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        self.link_blocks(&mut tree.blocks)
    }

    fn link_blocks(&self, blocks: &mut [Block]) -> usize {
        let mut links = 0;
        for block in blocks {
            links += match block {
                Block::Paragraph(inlines) => self.link_inlines(inlines),
                Block::List(list) => list
                    .items
                    .iter_mut()
                    .map(|item| self.link_blocks(&mut item.blocks))
                    .sum(),
                Block::BlockQuote(children) => self.link_blocks(children),
                Block::Table(table) => table
                    .header
                    .iter_mut()
                    .chain(table.rows.iter_mut().flatten())
                    .map(|cell| self.link_inlines(cell))
                    .sum(),
                Block::Heading(_) | Block::CodeBlock { .. } | Block::Rule => 0,
            };
        }
        links
    }

    fn link_inlines(&self, inlines: &mut Vec<Inline>) -> usize {
        let mut links = 0;
        let mut rewritten = Vec::with_capacity(inlines.len());

        for inline in inlines.drain(..) {
            match inline {
                Inline::Text(text) => {
                    let parts = self.link_text(&text);
                    links += parts
                        .iter()
                        .filter(|p| matches!(p, Inline::ExternalLink(_)))
                        .count();
                    rewritten.extend(parts);
                }
                Inline::Strong(mut children) => {
                    links += self.link_inlines(&mut children);
                    rewritten.push(Inline::Strong(children));
                }
                Inline::Emphasis(mut children) => {
                    links += self.link_inlines(&mut children);
                    rewritten.push(Inline::Emphasis(children));
                }
                other => rewritten.push(other),
            }
        }

        *inlines = rewritten;
        links
    }
}
