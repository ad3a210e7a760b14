//! Inline markdown parsing: code spans, images, links, strong and emphasis.

use regex::Regex;
use std::sync::LazyLock;

use super::node::Inline;

/// One regex with an alternative per inline construct, earliest match wins.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static INLINE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"`(?P<code>[^`]+)`",
        r#"|!\[(?P<img_alt>[^\]]*)\]\((?P<img_src>[^)\s]+)(?:\s+"[^"]*")?\)"#,
        r#"|\[(?P<link_text>[^\]]+)\]\((?P<link_href>[^)\s]+)(?:\s+"[^"]*")?\)"#,
        r"|\*\*(?P<strong>[^*]+)\*\*",
        r"|\*(?P<em>[^*\s][^*]*)\*",
    ))
    .expect("valid regex")
});

/// Parse a line of inline markdown into inline nodes.
///
/// Unrecognized markup is kept as literal text.
#[must_use]
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut last = 0;

    for caps in INLINE_TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            push_text(&mut inlines, &text[last..whole.start()]);
        }

        let node = if let Some(code) = caps.name("code") {
            Inline::Code(code.as_str().to_string())
        } else if let (Some(alt), Some(src)) = (caps.name("img_alt"), caps.name("img_src")) {
            Inline::Image {
                alt: alt.as_str().to_string(),
                src: src.as_str().to_string(),
            }
        } else if let (Some(label), Some(href)) = (caps.name("link_text"), caps.name("link_href"))
        {
            Inline::Link {
                href: href.as_str().to_string(),
                children: parse_inlines(label.as_str()),
            }
        } else if let Some(strong) = caps.name("strong") {
            Inline::Strong(parse_inlines(strong.as_str()))
        } else if let Some(em) = caps.name("em") {
            Inline::Emphasis(parse_inlines(em.as_str()))
        } else {
            Inline::Text(whole.as_str().to_string())
        };

        inlines.push(node);
        last = whole.end();
    }

    if last < text.len() {
        push_text(&mut inlines, &text[last..]);
    }

    inlines
}

/// Append text, merging with a preceding text node.
fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(prev)) = inlines.last_mut() {
        prev.push_str(text);
    } else {
        inlines.push(Inline::Text(text.to_string()));
    }
}
