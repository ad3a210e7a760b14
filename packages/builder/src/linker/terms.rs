//! Linking of defined terms to their terminology entries.
//!
//! Occurrences of defined terms, their plurals, hyphen-free spellings and
//! aliases are wrapped in term links. Headings, code, links and the
//! definitions articles that define the terms are left alone.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::content::{plain_text, Block, ContentTree, Heading, Inline};
use crate::types::TermRecord;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DEFINITIONS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article\s+\d+\w?\s*[-\x{2013}\x{2014}]\s*definitions").expect("valid regex")
});

/// Compiled alternations of a few hundred terms exceed the default limit.
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Wraps defined terms in text and content trees.
#[derive(Debug, Clone, Default)]
pub struct TermLinker {
    /// Lowercase spelling to term identifier.
    variants: HashMap<String, String>,
    pattern: Option<Regex>,
}

impl TermLinker {
    /// Build the spelling map and match pattern for a terminology set.
    #[must_use]
    pub fn new(terms: &[TermRecord]) -> Self {
        let variants = term_variants(terms);
        let pattern = build_pattern(&variants);
        Self { variants, pattern }
    }

    /// Number of distinct spellings matched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Term identifier for a spelling, in any case.
    #[must_use]
    pub fn lookup(&self, spelling: &str) -> Option<&str> {
        self.variants
            .get(&spelling.to_lowercase())
            .map(String::as_str)
    }

    /// Split a text into plain text and term links.
    ///
    /// Longer spellings win over shorter ones they contain. The link text
    /// keeps the casing found in the text.
    #[must_use]
    pub fn link_text(&self, text: &str) -> Vec<Inline> {
        let Some(pattern) = &self.pattern else {
            return vec![Inline::Text(text.to_string())];
        };

        let mut parts = Vec::new();
        let mut last = 0;
        for found in pattern.find_iter(text) {
            let Some(term_id) = self.lookup(found.as_str()) else {
                continue;
            };
            if found.start() > last {
                parts.push(Inline::Text(text[last..found.start()].to_string()));
            }
            parts.push(Inline::TermLink {
                term_id: term_id.to_string(),
                text: found.as_str().to_string(),
            });
            last = found.end();
        }

        if last < text.len() {
            parts.push(Inline::Text(text[last..].to_string()));
        }
        parts
    }

    /// Link terms throughout a tree, skipping definitions sections.
    /// Returns the number of term links made.
    pub fn link_tree(&self, tree: &mut ContentTree) -> usize {
        if self.is_empty() {
            return 0;
        }

        let mut links = 0;
        let mut section = DefinitionsState::Outside;
        for block in &mut tree.blocks {
            if let Block::Heading(heading) = &*block {
                section = section.enter(heading);
                continue;
            }
            section = section.observe(block);
            if section == DefinitionsState::Inside {
                continue;
            }
            links += self.link_blocks(std::slice::from_mut(block));
        }
        links
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
                        .filter(|p| matches!(p, Inline::TermLink { .. }))
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

/// Where the walk stands relative to a definitions section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionsState {
    Outside,
    /// Just past an article heading; its first block decides.
    AfterArticleHeading,
    Inside,
}

impl DefinitionsState {
    fn enter(self, heading: &Heading) -> Self {
        let text = heading.text();
        let id = heading.id.as_deref().unwrap_or_default();

        if id.contains("definitions")
            || text.trim().eq_ignore_ascii_case("definitions")
            || DEFINITIONS_HEADING.is_match(&text)
        {
            return Self::Inside;
        }
        if heading.level > 3 || heading.id.is_none() {
            return self;
        }
        if id.starts_with("article-") {
            Self::AfterArticleHeading
        } else {
            Self::Outside
        }
    }

    fn observe(self, block: &Block) -> Self {
        match (self, block) {
            (Self::AfterArticleHeading, Block::Paragraph(inlines))
                if plain_text(inlines).trim().eq_ignore_ascii_case("definitions") =>
            {
                Self::Inside
            }
            (Self::AfterArticleHeading, _) => Self::Outside,
            (state, _) => state,
        }
    }
}

/// Lowercase spellings of every term: the term, its hyphen-free form, its
/// plural and the plural's hyphen-free form, and its aliases.
///
/// A term's own spelling replaces any earlier entry; derived spellings
/// never do.
fn term_variants(terms: &[TermRecord]) -> HashMap<String, String> {
    let mut variants = HashMap::new();

    for record in terms {
        let term = record.term.trim().to_lowercase();
        if term.is_empty() {
            continue;
        }
        variants.insert(term.clone(), record.id.clone());

        let plural = pluralize(&term);
        let mut derived = vec![term.replace('-', " "), plural.clone(), plural.replace('-', " ")];
        derived.extend(
            record
                .aliases
                .iter()
                .map(|alias| alias.trim().to_lowercase())
                .filter(|alias| !alias.is_empty()),
        );

        for spelling in derived {
            variants
                .entry(spelling)
                .or_insert_with(|| record.id.clone());
        }
    }

    variants
}

/// Simple English plural of a lowercase term.
fn pluralize(term: &str) -> String {
    if ["s", "x", "ch", "sh"].iter().any(|end| term.ends_with(end)) {
        return format!("{term}es");
    }
    if let Some(stem) = term.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{term}s")
}

/// Case-insensitive alternation of all spellings on word boundaries,
/// longest first.
fn build_pattern(variants: &HashMap<String, String>) -> Option<Regex> {
    if variants.is_empty() {
        return None;
    }

    let mut spellings: Vec<&str> = variants.keys().map(String::as_str).collect();
    spellings.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = spellings
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            tracing::warn!(
                error = %e,
                spellings = spellings.len(),
                "Term pattern too large, terms will not be linked"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{assign_heading_ids, parse_markdown, render_html};
    use pretty_assertions::assert_eq;

    fn record(id: &str, term: &str, aliases: &[&str]) -> TermRecord {
        TermRecord {
            id: id.to_string(),
            term: term.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            sources: Vec::new(),
        }
    }

    fn linker() -> TermLinker {
        TermLinker::new(&[
            record("trust-service", "trust service", &[]),
            record(
                "qualified-trust-service-provider",
                "qualified trust service provider",
                &["QTSP"],
            ),
            record("wallet-relying-party", "wallet-relying party", &[]),
            record("supervisory-body", "supervisory body", &[]),
            record("access", "access", &[]),
        ])
    }

    fn term(id: &str, text: &str) -> Inline {
        Inline::TermLink {
            term_id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("trust service"), "trust services");
        assert_eq!(pluralize("supervisory body"), "supervisory bodies");
        assert_eq!(pluralize("relay"), "relays");
        assert_eq!(pluralize("access"), "accesses");
        assert_eq!(pluralize("match"), "matches");
    }

    #[test]
    fn test_variants_keep_own_spelling() {
        let linker = TermLinker::new(&[
            record("service", "service", &["trust services"]),
            record("trust-services", "trust services", &[]),
        ]);
        assert_eq!(linker.lookup("Trust Services"), Some("trust-services"));
        assert_eq!(linker.lookup("services"), Some("service"));
    }

    #[test]
    fn test_link_text_longest_first_and_case_kept() {
        let parts =
            linker().link_text("A Qualified Trust Service Provider offers trust services.");
        assert_eq!(
            parts,
            vec![
                Inline::Text("A ".to_string()),
                term("qualified-trust-service-provider", "Qualified Trust Service Provider"),
                Inline::Text(" offers ".to_string()),
                term("trust-service", "trust services"),
                Inline::Text(".".to_string()),
            ]
        );
    }

    #[test]
    fn test_link_text_plural_alias_and_hyphen_variants() {
        let parts = linker().link_text("QTSPs differ; a QTSP informs supervisory bodies and wallet relying parties.");
        let ids: Vec<&str> = parts
            .iter()
            .filter_map(|p| match p {
                Inline::TermLink { term_id, .. } => Some(term_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            ids,
            vec!["qualified-trust-service-provider", "supervisory-body", "wallet-relying-party"]
        );
    }

    #[test]
    fn test_link_text_respects_word_boundaries() {
        let text = "Accessibility and inaccessible services.";
        assert_eq!(linker().link_text(text), vec![Inline::Text(text.to_string())]);
    }

    #[test]
    fn test_link_tree_skips_headings_code_and_links() {
        let md = "### Trust service\n\nA trust service, `trust service` and [trust service](/ts).\n\n```\ntrust service\n```\n\n- **trust services** listed\n";
        let mut tree = parse_markdown(md);
        let links = linker().link_tree(&mut tree);
        assert_eq!(links, 2);

        let html = render_html(&tree);
        assert!(html.contains("<h3>Trust service</h3>"));
        assert!(html.contains("A <span class=\"term-link\" data-term-id=\"trust-service\" tabindex=\"0\">trust service</span>, <code>trust service</code>"));
        assert!(html.contains("<a href=\"/ts\">trust service</a>"));
        assert!(html.contains("<strong><span class=\"term-link\" data-term-id=\"trust-service\" tabindex=\"0\">trust services</span></strong>"));
    }

    #[test]
    fn test_link_tree_exempts_definitions_article() {
        let md = "### Article 3\n**Definitions**\n\nThe following definitions apply:\n\n- (a) 'trust service' means a service;\n\n### Article 4\n**Supervision**\n\nEach supervisory body oversees trust services.\n";
        let mut tree = parse_markdown(md);
        assign_heading_ids(&mut tree);
        let links = linker().link_tree(&mut tree);
        assert_eq!(links, 2);

        let html = render_html(&tree);
        let (definitions, rest) = html.split_once("id=\"article-4\"").unwrap();
        assert!(!definitions.contains("term-link"));
        assert!(rest.contains("data-term-id=\"supervisory-body\""));
    }

    #[test]
    fn test_link_tree_exempts_definitions_heading_text() {
        let md = "### Article 2 - Definitions\n\nA trust service is a service.\n\n## Chapter II {#chapter-ii}\n\nA trust service again.\n";
        let mut tree = parse_markdown(md);
        assign_heading_ids(&mut tree);
        assert_eq!(linker().link_tree(&mut tree), 1);
    }

    #[test]
    fn test_empty_terminology_links_nothing() {
        let linker = TermLinker::default();
        assert!(linker.is_empty());
        let mut tree = parse_markdown("A trust service.\n");
        assert_eq!(linker.link_tree(&mut tree), 0);
    }
}
