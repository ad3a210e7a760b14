//! Content tree node types.

use crate::annotate::Anchor;
use crate::text::normalize;

/// Inline content of a paragraph, heading or table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link { href: String, children: Vec<Inline> },
    Image { alt: String, src: String },
    /// Citation of a non-hosted document rewritten into a deep link.
    ExternalLink(ExternalLink),
    /// Occurrence of a defined term, in the document's own casing.
    TermLink { term_id: String, text: String },
}

/// Deep link to an external legal document viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalLink {
    pub href: String,
    /// Exactly the matched citation text.
    pub label: String,
    pub doc_id: String,
    pub short_name: String,
    pub title: String,
}

/// A heading. Identifiers are assigned before annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub content: Vec<Inline>,
    pub id: Option<String>,
}

impl Heading {
    /// Plain heading text.
    #[must_use]
    pub fn text(&self) -> String {
        plain_text(&self.content)
    }
}

/// An ordered or unordered list.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    /// Declared numbering offset; 1 for unordered lists.
    pub start: u32,
    pub items: Vec<ListItem>,
}

/// A list item with its block content and optional anchor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub blocks: Vec<Block>,
    pub anchor: Option<Anchor>,
}

impl ListItem {
    /// Create an unanchored item.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            anchor: None,
        }
    }

    /// Normalized text of the item's first paragraph, used for marker detection.
    #[must_use]
    pub fn leading_text(&self) -> String {
        match self.blocks.first() {
            Some(Block::Paragraph(inlines)) => normalize(&plain_text(inlines)),
            _ => String::new(),
        }
    }

    /// Normalized text of the whole item, nested lists included.
    #[must_use]
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        collect_block_text(&self.blocks, &mut parts);
        normalize(&parts.join(" "))
    }
}

/// A pipe table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(Heading),
    Paragraph(Vec<Inline>),
    List(List),
    CodeBlock { info: String, code: String },
    BlockQuote(Vec<Block>),
    Table(Table),
    Rule,
}

/// A document's content tree, blocks in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentTree {
    pub blocks: Vec<Block>,
}

impl ContentTree {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// Visible text of inline content. Code spans and images carry no prose.
#[must_use]
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Link { children, .. } => push_plain_text(children, out),
            Inline::ExternalLink(link) => out.push_str(&link.label),
            Inline::TermLink { text, .. } => out.push_str(text),
            Inline::Code(_) | Inline::Image { .. } => {}
        }
    }
}

/// Collect the plain text of blocks, one part per paragraph-like node.
pub fn collect_block_text(blocks: &[Block], parts: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Heading(heading) => parts.push(heading.text()),
            Block::Paragraph(inlines) => parts.push(plain_text(inlines)),
            Block::List(list) => {
                for item in &list.items {
                    collect_block_text(&item.blocks, parts);
                }
            }
            Block::BlockQuote(children) => collect_block_text(children, parts),
            Block::Table(table) => {
                for cell in table.header.iter().chain(table.rows.iter().flatten()) {
                    parts.push(plain_text(cell));
                }
            }
            Block::CodeBlock { .. } | Block::Rule => {}
        }
    }
}
