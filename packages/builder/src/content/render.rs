//! HTML rendering of an annotated content tree.

use std::fmt::Write;

use super::node::{Block, ContentTree, Inline, List, ListItem, Table};
use crate::annotate::{Anchor, Ordinal};
use crate::types::UnitKind;

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the tree to HTML. Anchors become `id`, `data-*` and class attributes.
#[must_use]
pub fn render_html(tree: &ContentTree) -> String {
    let mut out = String::new();
    render_blocks(&tree.blocks, &mut out);
    out
}

fn render_blocks(blocks: &[Block], out: &mut String) {
    for block in blocks {
        render_block(block, out);
    }
}

fn render_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading(heading) => {
            let id_attr = heading
                .id
                .as_deref()
                .map(|id| format!(" id=\"{}\"", escape_html(id)))
                .unwrap_or_default();
            let _ = write!(out, "<h{}{}>", heading.level, id_attr);
            render_inlines(&heading.content, out);
            let _ = writeln!(out, "</h{}>", heading.level);
        }
        Block::Paragraph(inlines) => {
            out.push_str("<p>");
            render_inlines(inlines, out);
            out.push_str("</p>\n");
        }
        Block::List(list) => render_list(list, out),
        Block::CodeBlock { info, code } => {
            if info.is_empty() {
                out.push_str("<pre><code>");
            } else {
                let _ = write!(out, "<pre><code class=\"language-{}\">", escape_html(info));
            }
            out.push_str(&escape_html(code));
            out.push_str("</code></pre>\n");
        }
        Block::BlockQuote(children) => {
            out.push_str("<blockquote>\n");
            render_blocks(children, out);
            out.push_str("</blockquote>\n");
        }
        Block::Table(table) => render_table(table, out),
        Block::Rule => out.push_str("<hr />\n"),
    }
}

fn render_list(list: &List, out: &mut String) {
    if !list.ordered {
        out.push_str("<ul>\n");
    } else if list.start == 1 {
        out.push_str("<ol>\n");
    } else {
        let _ = writeln!(out, "<ol start=\"{}\">", list.start);
    }

    for item in &list.items {
        render_item(item, out);
    }

    out.push_str(if list.ordered { "</ol>\n" } else { "</ul>\n" });
}

fn render_item(item: &ListItem, out: &mut String) {
    out.push_str("<li");
    if let Some(anchor) = &item.anchor {
        out.push_str(&anchor_attributes(anchor));
    }
    out.push('>');

    // Tight items render their first paragraph without a <p> wrapper
    let mut blocks = item.blocks.as_slice();
    if let Some((Block::Paragraph(inlines), rest)) = blocks.split_first() {
        render_inlines(inlines, out);
        blocks = rest;
        if !blocks.is_empty() {
            out.push('\n');
        }
    }
    render_blocks(blocks, out);

    out.push_str("</li>\n");
}

fn anchor_attributes(anchor: &Anchor) -> String {
    let mut attrs = format!(" id=\"{}\"", escape_html(&anchor.id));

    let data_name = match anchor.kind {
        UnitKind::Paragraph | UnitKind::AnnexSection => "data-para",
        UnitKind::Point => "data-point",
        UnitKind::Subpoint => "data-subpoint",
        UnitKind::Recital => "data-recital",
        UnitKind::Article => "data-article",
    };
    let value = match &anchor.ordinal {
        Ordinal::Number(n) => n.to_string(),
        Ordinal::Letter(c) => c.to_string(),
        Ordinal::Roman(r) => r.clone(),
    };
    let _ = write!(attrs, " {data_name}=\"{}\"", escape_html(&value));

    if let Some(article) = &anchor.article {
        let _ = write!(attrs, " data-article=\"{}\"", escape_html(article));
    }
    if let Some(para) = anchor.para {
        let _ = write!(attrs, " data-para=\"{para}\"");
    }
    if let Some(point) = anchor.point {
        let _ = write!(attrs, " data-point=\"{point}\"");
    }
    let _ = write!(attrs, " class=\"{}\"", anchor.kind.css_class());
    attrs
}

fn render_table(table: &Table, out: &mut String) {
    out.push_str("<table>\n");
    if !table.header.is_empty() {
        out.push_str("<thead><tr>");
        for cell in &table.header {
            out.push_str("<th>");
            render_inlines(cell, out);
            out.push_str("</th>");
        }
        out.push_str("</tr></thead>\n");
    }
    out.push_str("<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            render_inlines(cell, out);
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn render_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Code(code) => {
                let _ = write!(out, "<code>{}</code>", escape_html(code));
            }
            Inline::Strong(children) => {
                out.push_str("<strong>");
                render_inlines(children, out);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                render_inlines(children, out);
                out.push_str("</em>");
            }
            Inline::Link { href, children } => {
                let _ = write!(out, "<a href=\"{}\">", escape_html(href));
                render_inlines(children, out);
                out.push_str("</a>");
            }
            Inline::Image { alt, src } => {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"{}\" />",
                    escape_html(src),
                    escape_html(alt)
                );
            }
            Inline::ExternalLink(link) => {
                let _ = write!(
                    out,
                    "<a href=\"{}\" class=\"external-law-link\" data-doc-id=\"{}\" data-doc-short=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"{} (opens EUR-Lex in a new tab)\">{}</a>",
                    escape_html(&link.href),
                    escape_html(&link.doc_id),
                    escape_html(&link.short_name),
                    escape_html(&link.title),
                    escape_html(&link.label)
                );
            }
            Inline::TermLink { term_id, text } => {
                let _ = write!(
                    out,
                    "<span class=\"term-link\" data-term-id=\"{}\" tabindex=\"0\">{}</span>",
                    escape_html(term_id),
                    escape_html(text)
                );
            }
        }
    }
}
