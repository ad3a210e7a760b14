//! Listing of addressable units after annotation.

use std::collections::BTreeMap;

use super::types::ScopeKind;
use crate::content::{Block, ContentTree};
use crate::excerpts::format_title;
use crate::types::{AddressableUnit, Excerpt, UnitKind};

/// List every addressable unit of an annotated tree in document order.
///
/// Identified article, recital and annex headings become units alongside
/// the anchored list items. Excerpts are attached where the map has one.
#[must_use]
pub fn collect_units(
    tree: &ContentTree,
    excerpts: &BTreeMap<String, Excerpt>,
) -> Vec<AddressableUnit> {
    let mut units = Vec::new();
    collect_in_blocks(&tree.blocks, excerpts, &mut units);
    units
}

fn heading_kind(id: &str) -> Option<UnitKind> {
    match ScopeKind::from_heading_id(id) {
        ScopeKind::Article => Some(UnitKind::Article),
        ScopeKind::Recital => Some(UnitKind::Recital),
        ScopeKind::Annex => Some(UnitKind::AnnexSection),
        ScopeKind::RecitalCollection | ScopeKind::Unscoped => None,
    }
}

fn unit(
    id: &str,
    kind: UnitKind,
    article: Option<String>,
    excerpts: &BTreeMap<String, Excerpt>,
) -> AddressableUnit {
    AddressableUnit {
        id: id.to_string(),
        kind,
        title: format_title(id),
        excerpt: excerpts.get(id).map(|e| e.excerpt.clone()),
        article,
    }
}

fn collect_in_blocks(
    blocks: &[Block],
    excerpts: &BTreeMap<String, Excerpt>,
    units: &mut Vec<AddressableUnit>,
) {
    for block in blocks {
        match block {
            Block::Heading(heading) => {
                if let Some(id) = &heading.id {
                    if let Some(kind) = heading_kind(id) {
                        units.push(unit(id, kind, None, excerpts));
                    }
                }
            }
            Block::List(list) => {
                for item in &list.items {
                    if let Some(anchor) = &item.anchor {
                        units.push(unit(&anchor.id, anchor.kind, anchor.article.clone(), excerpts));
                    }
                    collect_in_blocks(&item.blocks, excerpts, units);
                }
            }
            Block::BlockQuote(children) => collect_in_blocks(children, excerpts, units),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Annotator;
    use crate::content::{assign_heading_ids, parse_markdown};
    use crate::excerpts::extract_excerpts;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_units() {
        let md = "## Chapter I\n\n### Article 6\n\n1. Member States shall designate one or more supervisory bodies established in their territory.\n   - (a) short\n\n## Annex II\n";
        let mut tree = parse_markdown(md);
        assign_heading_ids(&mut tree);
        Annotator::default().annotate(&mut tree);
        let excerpts = extract_excerpts(&tree);

        let units = collect_units(&tree, &excerpts);
        let summary: Vec<_> = units.iter().map(|u| (u.id.as_str(), u.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("article-6", UnitKind::Article),
                ("article-6-para-1", UnitKind::Paragraph),
                ("article-6-para-1-point-a", UnitKind::Point),
                ("annex-ii", UnitKind::AnnexSection),
            ]
        );

        let para = &units[1];
        assert_eq!(para.title, "Article 6(1)");
        assert_eq!(para.article.as_deref(), Some("article-6"));
        assert!(para.excerpt.is_some());
        assert_eq!(units[2].excerpt, None);
    }
}
