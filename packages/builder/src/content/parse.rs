//! Markdown block parsing into a [`ContentTree`].
//!
//! Line-oriented: each block kind is recognized by a regex on its first
//! line. Lists nest by indentation; any line indented deeper than its item's
//! marker belongs to that item and is parsed recursively after dedenting.

use regex::Regex;
use std::sync::LazyLock;

use super::inline::parse_inlines;
use super::node::{Block, ContentTree, Heading, List, ListItem, Table};

#[allow(clippy::expect_used)]
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static EXPLICIT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)[ \t]*\{#([A-Za-z0-9_-]+)\}$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^( *)([-*+]|(\d{1,9})[.)])(?:([ \t]+)(.*))?$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(```+|~~~+)[ \t]*(\S*)").expect("valid regex"));

#[allow(clippy::expect_used)]
static TABLE_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?$").expect("valid regex")
});

/// Parse a markdown document into a content tree.
#[must_use]
pub fn parse_markdown(markdown: &str) -> ContentTree {
    let lines: Vec<String> = markdown
        .lines()
        .map(|line| line.replace('\t', "    "))
        .collect();
    ContentTree::new(parse_blocks(&lines))
}

/// A parsed list marker.
struct Marker {
    indent: usize,
    ordered: bool,
    number: u32,
    /// Column where item content starts.
    content_col: usize,
    rest: String,
}

fn parse_marker(line: &str) -> Option<Marker> {
    let caps = LIST_ITEM.captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().len());
    let marker = caps.get(2)?.as_str();
    let number = caps
        .get(3)
        .and_then(|m| m.as_str().parse::<u32>().ok());
    let spacing = caps.get(4).map_or(1, |m| m.as_str().len());
    let rest = caps.get(5).map_or("", |m| m.as_str());
    Some(Marker {
        indent,
        ordered: number.is_some(),
        number: number.unwrap_or(1),
        content_col: indent + marker.len() + spacing,
        rest: rest.to_string(),
    })
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_quote_line(line: &str) -> bool {
    indent_of(line) <= 3 && line.trim_start().starts_with('>')
}

/// Whether a line opens a block other than a paragraph.
fn is_block_start(line: &str) -> bool {
    HEADING.is_match(line)
        || RULE.is_match(line)
        || FENCE.is_match(line)
        || is_quote_line(line)
        || is_table_line(line)
        || parse_marker(line).is_some()
}

/// Remove up to `width` leading spaces.
fn dedent(line: &str, width: usize) -> String {
    let strip = indent_of(line).min(width);
    line[strip..].to_string()
}

fn parse_blocks(lines: &[String]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_str();

        if is_blank(line) {
            i += 1;
            continue;
        }

        if let Some(caps) = FENCE.captures(line) {
            let fence = caps.get(1).map_or("```", |m| m.as_str());
            let info = caps.get(2).map_or("", |m| m.as_str()).to_string();
            let mut code = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with(fence) {
                code.push(lines[i].as_str());
                i += 1;
            }
            // Skip the closing fence (an unclosed fence runs to the end)
            i += 1;
            blocks.push(Block::CodeBlock {
                info,
                code: code.join("\n"),
            });
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let raw = caps.get(2).map_or("", |m| m.as_str());
            let (text, id) = match EXPLICIT_ID.captures(raw) {
                Some(id_caps) => (
                    id_caps.get(1).map_or("", |m| m.as_str()),
                    id_caps.get(2).map(|m| m.as_str().to_string()),
                ),
                None => (raw, None),
            };
            blocks.push(Block::Heading(Heading {
                level,
                content: parse_inlines(text.trim()),
                id,
            }));
            i += 1;
            continue;
        }

        if RULE.is_match(line) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if is_quote_line(line) {
            let mut quoted = Vec::new();
            while i < lines.len() && is_quote_line(&lines[i]) {
                let stripped = lines[i].trim_start().trim_start_matches('>');
                quoted.push(stripped.strip_prefix(' ').unwrap_or(stripped).to_string());
                i += 1;
            }
            blocks.push(Block::BlockQuote(parse_blocks(&quoted)));
            continue;
        }

        if is_table_line(line) {
            let start = i;
            while i < lines.len() && is_table_line(&lines[i]) {
                i += 1;
            }
            blocks.push(Block::Table(parse_table(&lines[start..i])));
            continue;
        }

        if let Some(marker) = parse_marker(line) {
            let (list, next) = parse_list(lines, i, marker);
            blocks.push(Block::List(list));
            i = next;
            continue;
        }

        // Paragraph: runs until a blank line or another block starts
        let mut text = vec![line.trim()];
        i += 1;
        while i < lines.len() && !is_blank(&lines[i]) && !is_block_start(&lines[i]) {
            text.push(lines[i].trim());
            i += 1;
        }
        blocks.push(Block::Paragraph(parse_inlines(&text.join(" "))));
    }

    blocks
}

/// Parse a list starting at `start`; returns the list and the next line index.
fn parse_list(lines: &[String], start: usize, first: Marker) -> (List, usize) {
    let mut list = List {
        ordered: first.ordered,
        start: if first.ordered { first.number } else { 1 },
        items: Vec::new(),
    };

    let mut i = start;
    let mut marker = Some(first);

    while let Some(current) = marker.take() {
        let mut item_lines = vec![current.rest.clone()];
        let mut saw_blank = false;
        i += 1;

        while i < lines.len() {
            let line = lines[i].as_str();
            if is_blank(line) {
                saw_blank = true;
                item_lines.push(String::new());
                i += 1;
                continue;
            }
            if indent_of(line) > current.indent {
                item_lines.push(dedent(line, current.content_col));
                saw_blank = false;
                i += 1;
                continue;
            }
            if !saw_blank && !is_block_start(line) {
                // Lazy paragraph continuation
                item_lines.push(line.trim_start().to_string());
                i += 1;
                continue;
            }
            break;
        }

        list.items.push(ListItem::new(parse_blocks(&item_lines)));

        if i < lines.len() {
            if let Some(next) = parse_marker(&lines[i]) {
                if next.indent == current.indent && next.ordered == list.ordered {
                    marker = Some(next);
                }
            }
        }
    }

    (list, i)
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn parse_table(lines: &[String]) -> Table {
    let mut table = Table::default();
    let has_header = lines.len() > 1 && TABLE_DELIMITER.is_match(lines[1].trim());

    for (idx, line) in lines.iter().enumerate() {
        if TABLE_DELIMITER.is_match(line.trim()) {
            continue;
        }
        let cells = split_row(line)
            .iter()
            .map(|cell| parse_inlines(cell))
            .collect();
        if has_header && idx == 0 {
            table.header = cells;
        } else {
            table.rows.push(cells);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::node::Inline;
    use pretty_assertions::assert_eq;

    fn first_list(tree: &ContentTree) -> &List {
        tree.blocks
            .iter()
            .find_map(|b| match b {
                Block::List(list) => Some(list),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let tree = parse_markdown("### Article 1\n\n**Subject matter**\n\nThis Regulation\nlays down rules.");
        assert_eq!(tree.blocks.len(), 3);
        let Block::Heading(heading) = &tree.blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.level, 3);
        assert_eq!(heading.text(), "Article 1");
        assert_eq!(heading.id, None);
        assert_eq!(
            tree.blocks[2],
            Block::Paragraph(vec![Inline::Text("This Regulation lays down rules.".to_string())])
        );
    }

    #[test]
    fn test_explicit_heading_id() {
        let tree = parse_markdown("## Chapter II {#chapter-2}");
        let Block::Heading(heading) = &tree.blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.text(), "Chapter II");
        assert_eq!(heading.id.as_deref(), Some("chapter-2"));
    }

    #[test]
    fn test_ordered_list_start() {
        let tree = parse_markdown("3. Third\n4. Fourth\n");
        let list = first_list(&tree);
        assert!(list.ordered);
        assert_eq!(list.start, 3);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].leading_text(), "Fourth");
    }

    #[test]
    fn test_nested_lists() {
        let md = "1. Paragraph:\n   - (a) Point:\n      - (i) First subpoint\n      - (ii) Second subpoint\n   - (b) Other point\n2. Second paragraph";
        let tree = parse_markdown(md);
        assert_eq!(tree.blocks.len(), 1);
        let list = first_list(&tree);
        assert_eq!(list.items.len(), 2);

        let Block::List(points) = &list.items[0].blocks[1] else {
            panic!("expected nested point list");
        };
        assert!(!points.ordered);
        assert_eq!(points.items.len(), 2);
        assert_eq!(points.items[0].leading_text(), "(a) Point:");

        let Block::List(subpoints) = &points.items[0].blocks[1] else {
            panic!("expected nested subpoint list");
        };
        assert_eq!(subpoints.items.len(), 2);
        assert_eq!(subpoints.items[1].leading_text(), "(ii) Second subpoint");
    }

    #[test]
    fn test_list_kind_change_starts_new_list() {
        let tree = parse_markdown("1. one\n- (a) two\n");
        assert_eq!(tree.blocks.len(), 2);
    }

    #[test]
    fn test_loose_list_items() {
        let tree = parse_markdown("1. First\n\n2. Second\n\n   continued\n\nAfter");
        let list = first_list(&tree);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].text(), "Second continued");
        assert_eq!(tree.blocks.len(), 2);
    }

    #[test]
    fn test_code_quote_rule_table() {
        let md = "```text\n### not a heading\n```\n\n> quoted **text**\n\n---\n\n| A | B |\n|---|---|\n| 1 | 2 |";
        let tree = parse_markdown(md);
        assert!(matches!(&tree.blocks[0], Block::CodeBlock { info, .. } if info == "text"));
        assert!(matches!(&tree.blocks[1], Block::BlockQuote(inner) if inner.len() == 1));
        assert_eq!(tree.blocks[2], Block::Rule);
        let Block::Table(table) = &tree.blocks[3] else {
            panic!("expected table");
        };
        assert_eq!(table.header.len(), 2);
        assert_eq!(table.rows.len(), 1);
    }
}
