//! Excerpt extraction for anchor previews.
//!
//! Builds a map from anchor identifier to a short preview of the text it
//! points at. Anchored list items are covered first; identified headings
//! then fill in what is still missing from the text that follows them.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::{MAX_EXCERPT_LENGTH, MIN_EXCERPT_LENGTH};
use crate::content::{plain_text, Block, ContentTree, ListItem};
use crate::text::{normalize, truncate_at_word};
use crate::types::Excerpt;

#[allow(clippy::expect_used)]
static ARTICLE_PARA_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^article-(\d+[a-z]?)-para-(\d+)-point-([a-z])$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static ARTICLE_PARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^article-(\d+[a-z]?)-para-(\d+)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^article-(\d+[a-z]?)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static RECITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^recital-(\d+)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static ANNEX_PARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^annex-([ivxlc]+)-para-(\d+)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static ANNEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^annex-([ivxlc]+)$").expect("valid regex"));

/// Human title for an anchor identifier, derived from its shape alone.
///
/// # Examples
/// ```
/// use regdocs_builder::excerpts::format_title;
///
/// assert_eq!(format_title("article-5b-para-3-point-a"), "Article 5b(3)(a)");
/// assert_eq!(format_title("annex-i-para-5"), "Annex I(5)");
/// assert_eq!(format_title("chapter-ii"), "Chapter Ii");
/// ```
#[must_use]
pub fn format_title(id: &str) -> String {
    if let Some(caps) = ARTICLE_PARA_POINT.captures(id) {
        return format!("Article {}({})({})", &caps[1], &caps[2], &caps[3]);
    }
    if let Some(caps) = ARTICLE_PARA.captures(id) {
        return format!("Article {}({})", &caps[1], &caps[2]);
    }
    if let Some(caps) = ARTICLE.captures(id) {
        return format!("Article {}", &caps[1]);
    }
    if let Some(caps) = RECITAL.captures(id) {
        return format!("Recital {}", &caps[1]);
    }
    if let Some(caps) = ANNEX_PARA.captures(id) {
        return format!("Annex {}({})", caps[1].to_uppercase(), &caps[2]);
    }
    if let Some(caps) = ANNEX.captures(id) {
        return format!("Annex {}", caps[1].to_uppercase());
    }
    if id == "annex" {
        return "Annex".to_string();
    }

    id.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn normalized text into an excerpt: `None` when shorter than the
/// minimum, truncated at a word boundary when longer than the maximum.
#[must_use]
pub fn make_excerpt(text: &str) -> Option<String> {
    if text.chars().count() < MIN_EXCERPT_LENGTH {
        return None;
    }
    Some(truncate_at_word(text, MAX_EXCERPT_LENGTH))
}

/// Extract excerpts for every anchored item and identified heading.
#[must_use]
pub fn extract_excerpts(tree: &ContentTree) -> BTreeMap<String, Excerpt> {
    let mut excerpts = BTreeMap::new();

    collect_item_excerpts(&tree.blocks, &mut excerpts);
    let from_items = excerpts.len();

    collect_heading_excerpts(&tree.blocks, &mut excerpts);
    tracing::debug!(
        items = from_items,
        headings = excerpts.len() - from_items,
        "Extracted excerpts"
    );

    excerpts
}

fn collect_item_excerpts(blocks: &[Block], excerpts: &mut BTreeMap<String, Excerpt>) {
    for block in blocks {
        match block {
            Block::List(list) => {
                for item in &list.items {
                    if let Some(anchor) = &item.anchor {
                        if let Some(excerpt) = make_excerpt(&item.text()) {
                            excerpts.entry(anchor.id.clone()).or_insert_with(|| Excerpt {
                                title: format_title(&anchor.id),
                                excerpt,
                            });
                        }
                    }
                    collect_item_excerpts(&item.blocks, excerpts);
                }
            }
            Block::BlockQuote(children) => collect_item_excerpts(children, excerpts),
            _ => {}
        }
    }
}

fn collect_heading_excerpts(blocks: &[Block], excerpts: &mut BTreeMap<String, Excerpt>) {
    for (idx, block) in blocks.iter().enumerate() {
        let Block::Heading(heading) = block else {
            continue;
        };
        if !(2..=3).contains(&heading.level) {
            continue;
        }
        let Some(id) = &heading.id else {
            continue;
        };
        if excerpts.contains_key(id) {
            continue;
        }

        let rest = &blocks[idx + 1..];
        let end = rest
            .iter()
            .position(|b| matches!(b, Block::Heading(h) if h.level <= heading.level))
            .unwrap_or(rest.len());

        if let Some(excerpt) = make_excerpt(&zone_text(&rest[..end])) {
            excerpts.insert(
                id.clone(),
                Excerpt {
                    title: format_title(id),
                    excerpt,
                },
            );
        }
    }
}

/// Preview text for the blocks under a heading: paragraphs first, then
/// the first list item.
fn zone_text(zone: &[Block]) -> String {
    let mut paragraphs = Vec::new();
    collect_paragraphs(zone, &mut paragraphs);

    let mut text = String::new();
    for paragraph in paragraphs {
        if paragraph.chars().count() >= MIN_EXCERPT_LENGTH {
            text = paragraph;
            break;
        }
        if !text.is_empty() && !paragraph.is_empty() {
            text.push(' ');
        }
        text.push_str(&paragraph);
        if text.chars().count() >= MIN_EXCERPT_LENGTH {
            break;
        }
    }

    if text.chars().count() < MIN_EXCERPT_LENGTH {
        if let Some(item_text) = first_list_item(zone).map(ListItem::text) {
            if item_text.chars().count() >= MIN_EXCERPT_LENGTH {
                return item_text;
            }
        }
    }

    text
}

fn collect_paragraphs(blocks: &[Block], out: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Paragraph(inlines) => out.push(normalize(&plain_text(inlines))),
            Block::BlockQuote(children) => collect_paragraphs(children, out),
            _ => {}
        }
    }
}

fn first_list_item(blocks: &[Block]) -> Option<&ListItem> {
    blocks.iter().find_map(|block| match block {
        Block::List(list) => list.items.first(),
        _ => None,
    })
}
