//! Types for the document structure annotator.

use crate::types::UnitKind;

/// Positional value of an anchored unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordinal {
    /// Paragraph, annex paragraph or recital number.
    Number(u32),
    /// Point letter.
    Letter(char),
    /// Subpoint numeral, lowercase.
    Roman(String),
}

/// Anchor attached to an addressable list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Document-unique identifier, e.g. `article-5-para-3-point-a`.
    pub id: String,
    pub kind: UnitKind,
    pub ordinal: Ordinal,
    /// Enclosing article for units inside an article scope.
    pub article: Option<String>,
    /// Number of the enclosing paragraph, for points and subpoints.
    pub para: Option<u32>,
    /// Letter of the enclosing point, for subpoints.
    pub point: Option<char>,
}

/// What the innermost identified heading makes of the content below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Article,
    /// The `recitals` heading listing all recitals.
    RecitalCollection,
    /// A single `recital-<n>` heading.
    Recital,
    Annex,
    /// Chapters, sections and other headings that end article scope.
    Unscoped,
}

impl ScopeKind {
    /// Classify a heading identifier.
    #[must_use]
    pub fn from_heading_id(id: &str) -> Self {
        if id.starts_with("article-") {
            Self::Article
        } else if id == "recitals" {
            Self::RecitalCollection
        } else if id
            .strip_prefix("recital-")
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        {
            Self::Recital
        } else if id == "annex"
            || id
                .strip_prefix("annex-")
                .is_some_and(|r| !r.is_empty() && r.bytes().all(|b| b"ivxlc".contains(&b)))
        {
            Self::Annex
        } else {
            Self::Unscoped
        }
    }
}

/// One identified heading on the scope stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub level: u8,
    pub id: String,
    pub kind: ScopeKind,
}

/// Stack of enclosing identified headings, outermost first.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a heading: closes every open heading at the same or deeper level.
    pub fn enter(&mut self, level: u8, id: impl Into<String>) {
        while self.entries.last().is_some_and(|e| e.level >= level) {
            self.entries.pop();
        }
        let id = id.into();
        let kind = ScopeKind::from_heading_id(&id);
        self.entries.push(ScopeEntry { level, id, kind });
    }

    /// Innermost entry.
    #[must_use]
    pub fn current(&self) -> Option<&ScopeEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        self.current().map_or(ScopeKind::Unscoped, |e| e.kind)
    }

    /// Identifier of the innermost heading, when it opens a unit scope.
    #[must_use]
    pub fn scope_id(&self) -> Option<&str> {
        self.current()
            .filter(|e| e.kind != ScopeKind::Unscoped)
            .map(|e| e.id.as_str())
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

/// Shape of the list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    Ordered { start: u32 },
    Unordered,
}

/// Everything a matcher may inspect about one list item.
#[derive(Debug, Clone)]
pub struct ItemContext<'a> {
    pub scope: ScopeKind,
    /// Identifier of the scope heading; `None` when unscoped.
    pub scope_id: Option<&'a str>,
    pub shape: ListShape,
    /// Zero-based position in the list.
    pub position: usize,
    /// Normalized text of the item's first paragraph.
    pub leading_text: &'a str,
    /// Anchors of enclosing list items, outermost first.
    pub enclosing: &'a [Anchor],
    /// List nesting depth below the scope heading (0 = top-level list).
    pub depth: usize,
}

impl ItemContext<'_> {
    /// Nearest enclosing anchor of one of the given kinds.
    #[must_use]
    pub fn nearest(&self, kinds: &[UnitKind]) -> Option<&Anchor> {
        self.enclosing.iter().rev().find(|a| kinds.contains(&a.kind))
    }

    /// Number of the nearest enclosing paragraph or annex paragraph.
    #[must_use]
    pub fn para_number(&self) -> Option<u32> {
        match self.nearest(&[UnitKind::Paragraph, UnitKind::AnnexSection])?.ordinal {
            Ordinal::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Letter of the nearest enclosing point.
    #[must_use]
    pub fn point_letter(&self) -> Option<char> {
        match self.nearest(&[UnitKind::Point])?.ordinal {
            Ordinal::Letter(c) => Some(c),
            _ => None,
        }
    }

    /// Enclosing article, when inside an article scope.
    #[must_use]
    pub fn article(&self) -> Option<String> {
        match self.scope {
            ScopeKind::Article => self.scope_id.map(str::to_string),
            _ => None,
        }
    }
}

/// Counters reported after annotating one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    pub paragraphs: usize,
    pub points: usize,
    pub subpoints: usize,
    pub recitals: usize,
    pub annex_sections: usize,
    /// Generated identifiers dropped because they already existed.
    pub duplicates: usize,
    /// Items inside a unit scope that no matcher recognized.
    pub unmatched: usize,
}

impl AnnotationStats {
    /// Count one assigned anchor.
    pub fn record(&mut self, kind: UnitKind) {
        match kind {
            UnitKind::Paragraph => self.paragraphs += 1,
            UnitKind::Point => self.points += 1,
            UnitKind::Subpoint => self.subpoints += 1,
            UnitKind::Recital => self.recitals += 1,
            UnitKind::AnnexSection => self.annex_sections += 1,
            UnitKind::Article => {}
        }
    }

    /// Total anchors assigned.
    #[must_use]
    pub fn anchors(&self) -> usize {
        self.paragraphs + self.points + self.subpoints + self.recitals + self.annex_sections
    }
}
