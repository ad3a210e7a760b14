//! Text normalization utilities for indexing and excerpting.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::{ELLIPSIS, HEADING_SLUG_MAX_LENGTH, TRUNCATION_FLOOR};

// Static regexes for stripping markdown - all patterns are guaranteed to be valid
#[allow(clippy::expect_used)]
static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("valid regex"));

#[allow(clippy::expect_used)]
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("valid regex"));

#[allow(clippy::expect_used)]
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("valid regex"));

#[allow(clippy::expect_used)]
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));

#[allow(clippy::expect_used)]
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid regex"));

#[allow(clippy::expect_used)]
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));

#[allow(clippy::expect_used)]
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid regex"));

#[allow(clippy::expect_used)]
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^>\s*").expect("valid regex"));

#[allow(clippy::expect_used)]
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^---+$").expect("valid regex"));

#[allow(clippy::expect_used)]
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-*+]\s+").expect("valid regex"));

#[allow(clippy::expect_used)]
static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+").expect("valid regex"));

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

#[allow(clippy::expect_used)]
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// One pass of markdown stripping.
fn strip_once(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, "");
    let text = INLINE_CODE.replace_all(&text, "");
    // Images before links: `![alt](src)` would otherwise leave `!alt`
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING_MARKER.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = BULLET_MARKER.replace_all(&text, "");
    let text = NUMBER_MARKER.replace_all(&text, "");
    let text = text.replace('|', " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Convert formatted body text to plain, comparison-safe text.
///
/// Removes fenced and inline code, keeps only the visible text of links,
/// drops images, strips heading, emphasis, blockquote, rule and list
/// markers, turns table delimiters into spaces and collapses whitespace.
///
/// Total on any input and idempotent: stripping can expose new markers
/// (`## ## Title`), so passes repeat until the text is stable. Every
/// changing pass either shortens the text or removes a `|`, so the loop
/// terminates.
///
/// # Examples
/// ```
/// use regdocs_builder::text::normalize;
///
/// assert_eq!(normalize("**Scope** of [eIDAS](https://x)"), "Scope of eIDAS");
/// ```
pub fn normalize(text: &str) -> String {
    let mut result = strip_once(text);
    loop {
        let next = strip_once(&result);
        if next == result {
            return result;
        }
        result = next;
    }
}

/// Take at most `max_chars` characters, never splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Truncate text to `max_chars` at a word boundary, appending an ellipsis.
///
/// Cuts at the last space before the limit when that space lies past
/// [`TRUNCATION_FLOOR`] of the limit, otherwise cuts hard.
#[must_use]
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated = truncate_chars(text, max_chars);
    let floor = max_chars as f64 * TRUNCATION_FLOOR;

    if let Some(last_space) = truncated.rfind(' ') {
        let space_chars = truncated[..last_space].chars().count();
        if space_chars as f64 > floor {
            return format!("{}{ELLIPSIS}", &truncated[..last_space]);
        }
    }

    format!("{truncated}{ELLIPSIS}")
}

/// Lowercase, dash-separated identifier for a heading or section label.
///
/// `"Article 5b"` → `"article-5b"`, `"Chapter II: Scope"` → `"chapter-ii-scope"`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
    let dashed = WHITESPACE.replace_all(cleaned.trim(), "-");
    truncate_chars(&dashed, HEADING_SLUG_MAX_LENGTH)
        .trim_end_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_strips_markup() {
        let input = "### Article 1\n\n**Subject matter**\n\n1. This Regulation lays down `code` rules.\n- (a) see [Annex I](#annex-i)\n\n> quoted\n\n---\n\n| a | b |";
        assert_eq!(
            normalize(input),
            "Article 1 Subject matter This Regulation lays down rules. (a) see Annex I quoted a b"
        );
    }

    #[test]
    fn test_normalize_drops_images_and_fences() {
        let input = "Intro ![logo](logo.png) text\n```\nlet x = 1;\n```\nafter";
        assert_eq!(normalize(input), "Intro text after");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_normalize_idempotent_on_nested_markers() {
        let samples = [
            "## ## Title",
            "- - nested bullet",
            "****double****",
            "[[inner](a)](b)",
            "a|b||c",
            "> > > deep quote",
            "1. 2. numbered twice",
            "`a` ``b`` ```c```",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Übereinkommen", 3), "Übe");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_at_word_short_text_unchanged() {
        assert_eq!(truncate_at_word("short text", 300), "short text");
    }

    #[test]
    fn test_truncate_at_word_cuts_at_space() {
        let text = format!("{} tail", "word ".repeat(70));
        let out = truncate_at_word(&text, 300);
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 303);
        assert!(!out.trim_end_matches("...").ends_with(' '));
    }

    #[test]
    fn test_truncate_at_word_hard_cut_without_late_space() {
        let text = format!("{} {}", "a".repeat(100), "b".repeat(400));
        let out = truncate_at_word(&text, 300);
        assert_eq!(out.chars().count(), 303);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Article 5b"), "article-5b");
        assert_eq!(slugify("Chapter II: Scope"), "chapter-ii-scope");
        assert_eq!(slugify("  Final   provisions "), "final-provisions");
    }
}
