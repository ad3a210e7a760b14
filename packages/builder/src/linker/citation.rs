//! Citation detection for EU regulations and directives.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::config::eurlex_url;

/// `[Article N[(M)][, point (x)][,] of] Regulation|Directive (EU|EC) [No] NUMBER/YEAR`
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:Article\s+(\d+)(?:\s*\(\s*(\d+)\s*\))?(?:\s*,\s*point\s*\([^)]+\))?(?:\s*,)?\s+of\s+)?",
        r"(?:Regulation|Directive)\s+\(E[CU]\)\s+(?:No\s+)?(\d{4}/\d{1,4}|\d{1,4}/\d{4})\b",
    ))
    .expect("valid regex")
});

/// One citation found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Byte range of the matched text.
    pub range: Range<usize>,
    /// Cited document identifier as written, e.g. `2022/1925`.
    pub doc_id: String,
    pub article: Option<u32>,
    pub paragraph: Option<u32>,
}

impl Citation {
    /// Anchor within the cited document: `#006.007` for article and
    /// paragraph, `#art_6` for an article alone.
    #[must_use]
    pub fn fragment(&self) -> Option<String> {
        match (self.article, self.paragraph) {
            (Some(article), Some(paragraph)) => Some(format!("{article:03}.{paragraph:03}")),
            (Some(article), None) => Some(format!("art_{article}")),
            _ => None,
        }
    }

    /// Viewer URL for the cited document.
    #[must_use]
    pub fn target(&self, celex: &str) -> String {
        match self.fragment() {
            Some(fragment) => format!("{}#{fragment}", eurlex_url(celex)),
            None => eurlex_url(celex),
        }
    }
}

/// Find all citations in a text, left to right, non-overlapping.
#[must_use]
pub fn find_citations(text: &str) -> Vec<Citation> {
    CITATION
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Citation {
                range: whole.range(),
                doc_id: caps.get(3)?.as_str().to_string(),
                article: caps.get(1).and_then(|m| m.as_str().parse().ok()),
                paragraph: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            })
        })
        .collect()
}
