//! Unit matchers: one strategy per kind of addressable list item.

use regex::Regex;
use std::sync::LazyLock;

use super::types::{Anchor, ItemContext, ListShape, Ordinal, ScopeKind};
use crate::types::UnitKind;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LETTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(([a-z])\)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROMAN_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\((i{1,3}|iv|v|vi{1,3}|ix|x|xi{1,3}|xiv|xv)\)").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\((\d+)\)").expect("valid regex"));

/// Strategy recognizing one kind of addressable list item.
///
/// Matchers never guess: an item that does not fit gets `None`.
pub trait UnitMatcher: Send + Sync {
    /// Kind of unit this matcher produces.
    fn kind(&self) -> UnitKind;

    /// Produce the anchor for an item, if it is this kind of unit.
    fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor>;
}

/// Number of an item in an ordered list: declared start plus position.
fn list_number(start: u32, position: usize) -> u32 {
    start.saturating_add(u32::try_from(position).unwrap_or(u32::MAX))
}

/// Numbered paragraphs: ordered lists directly under an article heading.
pub struct ParagraphMatcher;

impl UnitMatcher for ParagraphMatcher {
    fn kind(&self) -> UnitKind {
        UnitKind::Paragraph
    }

    fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor> {
        if item.scope != ScopeKind::Article || !item.enclosing.is_empty() {
            return None;
        }
        let ListShape::Ordered { start } = item.shape else {
            return None;
        };
        let article = item.scope_id?;
        let n = list_number(start, item.position);

        Some(Anchor {
            id: format!("{article}-para-{n}"),
            kind: UnitKind::Paragraph,
            ordinal: Ordinal::Number(n),
            article: Some(article.to_string()),
            para: None,
            point: None,
        })
    }
}

/// Numbered annex paragraphs: ordered lists directly under an annex heading.
pub struct AnnexParagraphMatcher;

impl UnitMatcher for AnnexParagraphMatcher {
    fn kind(&self) -> UnitKind {
        UnitKind::AnnexSection
    }

    fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor> {
        if item.scope != ScopeKind::Annex || !item.enclosing.is_empty() {
            return None;
        }
        let ListShape::Ordered { start } = item.shape else {
            return None;
        };
        let annex = item.scope_id?;
        let n = list_number(start, item.position);

        Some(Anchor {
            id: format!("{annex}-para-{n}"),
            kind: UnitKind::AnnexSection,
            ordinal: Ordinal::Number(n),
            article: None,
            para: None,
            point: None,
        })
    }
}

/// Recitals: every item of a top-level list under the recitals heading.
///
/// The number comes from the item's own `(n)` prefix when present, else
/// from its list position.
pub struct RecitalMatcher;

impl UnitMatcher for RecitalMatcher {
    fn kind(&self) -> UnitKind {
        UnitKind::Recital
    }

    fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor> {
        if item.scope != ScopeKind::RecitalCollection || item.depth > 0 {
            return None;
        }

        let declared = NUMBER_MARKER
            .captures(item.leading_text)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        let n = declared.unwrap_or_else(|| {
            let start = match item.shape {
                ListShape::Ordered { start } => start,
                ListShape::Unordered => 1,
            };
            list_number(start, item.position)
        });

        Some(Anchor {
            id: format!("recital-{n}"),
            kind: UnitKind::Recital,
            ordinal: Ordinal::Number(n),
            article: None,
            para: None,
            point: None,
        })
    }
}

/// Lettered points `(a)` in unordered lists.
///
/// Rooted at the nearest enclosing paragraph, annex paragraph or recital,
/// else at the scope heading.
pub struct PointMatcher;

impl UnitMatcher for PointMatcher {
    fn kind(&self) -> UnitKind {
        UnitKind::Point
    }

    fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor> {
        if item.shape != ListShape::Unordered {
            return None;
        }
        let caps = LETTER_MARKER.captures(item.leading_text)?;
        let letter = caps[1].chars().next()?;

        let base = item
            .nearest(&[UnitKind::Paragraph, UnitKind::AnnexSection, UnitKind::Recital])
            .map(|a| a.id.as_str())
            .or(item.scope_id)?;

        Some(Anchor {
            id: format!("{base}-point-{letter}"),
            kind: UnitKind::Point,
            ordinal: Ordinal::Letter(letter),
            article: item.article(),
            para: item.para_number(),
            point: None,
        })
    }
}

/// Roman-numbered subpoints `(iv)` in unordered lists.
///
/// Rooted at the nearest enclosing point, else paragraph, annex paragraph
/// or recital, else the scope heading.
pub struct SubpointMatcher;

impl UnitMatcher for SubpointMatcher {
    fn kind(&self) -> UnitKind {
        UnitKind::Subpoint
    }

    fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor> {
        if item.shape != ListShape::Unordered {
            return None;
        }
        let caps = ROMAN_MARKER.captures(item.leading_text)?;
        let roman = caps[1].to_string();

        let base = item
            .nearest(&[UnitKind::Point])
            .or_else(|| {
                item.nearest(&[UnitKind::Paragraph, UnitKind::AnnexSection, UnitKind::Recital])
            })
            .map(|a| a.id.as_str())
            .or(item.scope_id)?;

        Some(Anchor {
            id: format!("{base}-subpoint-{roman}"),
            kind: UnitKind::Subpoint,
            ordinal: Ordinal::Roman(roman),
            article: item.article(),
            para: item.para_number(),
            point: item.point_letter(),
        })
    }
}
