//! Heading identifier assignment.
//!
//! Gives every level-2+ heading a stable identifier before annotation, so
//! that article, recital and annex headings carry the IDs the annotator
//! scopes on.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::node::{Block, ContentTree, Heading};
use crate::text::slugify;

#[allow(clippy::expect_used)]
static ARTICLE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^article\s+(\d+[a-z]?)\b").expect("valid regex"));

#[allow(clippy::expect_used)]
static RECITAL_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^recital\s+\(?(\d+)\)?").expect("valid regex"));

#[allow(clippy::expect_used)]
static ANNEX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^annex(?:\s+([ivxlc]+))?\b").expect("valid regex"));

/// Derive the identifier for a heading text.
///
/// Returns `None` when the text has no sluggable characters.
///
/// # Examples
/// ```
/// use regdocs_builder::content::heading_id;
///
/// assert_eq!(heading_id("Article 5b").as_deref(), Some("article-5b"));
/// assert_eq!(heading_id("ANNEX IV: Requirements").as_deref(), Some("annex-iv"));
/// assert_eq!(heading_id("Recitals").as_deref(), Some("recitals"));
/// ```
#[must_use]
pub fn heading_id(text: &str) -> Option<String> {
    let text = text.trim();

    if let Some(caps) = ARTICLE_HEADING.captures(text) {
        return Some(format!("article-{}", caps[1].to_lowercase()));
    }
    if let Some(caps) = RECITAL_HEADING.captures(text) {
        return Some(format!("recital-{}", &caps[1]));
    }
    if let Some(caps) = ANNEX_HEADING.captures(text) {
        return Some(match caps.get(1) {
            Some(roman) => format!("annex-{}", roman.as_str().to_lowercase()),
            None => "annex".to_string(),
        });
    }

    let slug = slugify(text);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Assign identifiers to all headings below level 1 that lack one.
///
/// Explicit `{#id}` identifiers are kept. Repeated identifiers get a
/// numeric suffix (`-1`, `-2`, ...) so they stay unique in the document.
pub fn assign_heading_ids(tree: &mut ContentTree) {
    let mut seen = HashSet::new();
    assign_in_blocks(&mut tree.blocks, &mut seen);
}

fn assign_in_blocks(blocks: &mut [Block], seen: &mut HashSet<String>) {
    for block in blocks {
        match block {
            Block::Heading(heading) => assign_heading(heading, seen),
            Block::BlockQuote(children) => assign_in_blocks(children, seen),
            Block::List(list) => {
                for item in &mut list.items {
                    assign_in_blocks(&mut item.blocks, seen);
                }
            }
            _ => {}
        }
    }
}

fn assign_heading(heading: &mut Heading, seen: &mut HashSet<String>) {
    let base = match heading.id.take() {
        Some(explicit) => explicit,
        None if heading.level == 1 => return,
        None => match heading_id(&heading.text()) {
            Some(id) => id,
            None => return,
        },
    };

    let mut id = base.clone();
    let mut suffix = 1;
    while seen.contains(&id) {
        id = format!("{base}-{suffix}");
        suffix += 1;
    }
    if id != base {
        tracing::debug!(heading = %base, assigned = %id, "Duplicate heading identifier");
    }

    seen.insert(id.clone());
    heading.id = Some(id);
}
