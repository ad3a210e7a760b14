//! Annotation engine that walks a content tree using the matcher registry.

use std::collections::HashSet;

use super::config::create_eu_matcher_registry;
use super::registry::MatcherRegistry;
use super::types::{Anchor, AnnotationStats, ItemContext, ListShape, ScopeStack};
use crate::content::{Block, ContentTree, List};
use crate::types::UnitKind;

/// Traversal state for one document. Never shared between documents.
#[derive(Debug, Default)]
struct AnnotationState {
    scope: ScopeStack,
    /// Every identifier already used in the document, headings included.
    seen: HashSet<String>,
    /// Paragraphs anchored since the scope heading was entered.
    paragraphs_in_scope: u32,
    stats: AnnotationStats,
}

impl AnnotationState {
    fn enter_heading(&mut self, level: u8, id: &str) {
        if let Some(previous) = self.scope.scope_id() {
            tracing::trace!(
                scope = %previous,
                paragraphs = self.paragraphs_in_scope,
                "Leaving scope"
            );
        }
        self.scope.enter(level, id);
        self.paragraphs_in_scope = 0;
    }
}

/// Engine attaching anchors to the list items of a content tree.
///
/// Headings of level 2 and 3 that carry an identifier open a scope; all
/// other headings are transparent. Each list item is offered to the
/// registry's matchers with its scope and enclosing anchors.
pub struct Annotator {
    registry: MatcherRegistry,
}

impl Annotator {
    /// Create an annotator with a custom registry.
    #[must_use]
    pub fn new(registry: MatcherRegistry) -> Self {
        Self { registry }
    }

    /// Annotate a tree in place. Heading identifiers must already be assigned.
    pub fn annotate(&self, tree: &mut ContentTree) -> AnnotationStats {
        let mut state = AnnotationState::default();
        collect_heading_ids(&tree.blocks, &mut state.seen);

        self.walk_blocks(&mut tree.blocks, &mut state);
        state.stats
    }

    fn walk_blocks(&self, blocks: &mut [Block], state: &mut AnnotationState) {
        for block in blocks {
            match block {
                Block::Heading(heading) if (2..=3).contains(&heading.level) => {
                    if let Some(id) = &heading.id {
                        state.enter_heading(heading.level, id);
                    }
                }
                Block::List(list) => {
                    let mut enclosing = Vec::new();
                    self.annotate_list(list, &mut enclosing, 0, state);
                }
                Block::BlockQuote(children) => self.walk_blocks(children, state),
                _ => {}
            }
        }
    }

    fn annotate_list(
        &self,
        list: &mut List,
        enclosing: &mut Vec<Anchor>,
        depth: usize,
        state: &mut AnnotationState,
    ) {
        let shape = if list.ordered {
            ListShape::Ordered { start: list.start }
        } else {
            ListShape::Unordered
        };

        for (position, item) in list.items.iter_mut().enumerate() {
            let leading_text = item.leading_text();
            let in_scope = state.scope.scope_id().is_some();
            let matched = {
                let context = ItemContext {
                    scope: state.scope.kind(),
                    scope_id: state.scope.scope_id(),
                    shape,
                    position,
                    leading_text: &leading_text,
                    enclosing: enclosing.as_slice(),
                    depth,
                };
                self.registry.match_item(&context)
            };

            let anchor = match matched {
                Some(anchor) if state.seen.insert(anchor.id.clone()) => {
                    state.stats.record(anchor.kind);
                    if anchor.kind == UnitKind::Paragraph {
                        state.paragraphs_in_scope += 1;
                    }
                    Some(anchor)
                }
                Some(anchor) => {
                    tracing::debug!(id = %anchor.id, "Duplicate anchor identifier, not assigned");
                    state.stats.duplicates += 1;
                    None
                }
                None => {
                    if in_scope {
                        state.stats.unmatched += 1;
                    }
                    None
                }
            };

            item.anchor.clone_from(&anchor);
            let pushed = match anchor {
                Some(anchor) => {
                    enclosing.push(anchor);
                    true
                }
                None => false,
            };

            for block in &mut item.blocks {
                if let Block::List(nested) = block {
                    self.annotate_list(nested, enclosing, depth + 1, state);
                }
            }

            if pushed {
                enclosing.pop();
            }
        }
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(create_eu_matcher_registry())
    }
}

fn collect_heading_ids(blocks: &[Block], seen: &mut HashSet<String>) {
    for block in blocks {
        match block {
            Block::Heading(heading) => {
                if let Some(id) = &heading.id {
                    seen.insert(id.clone());
                }
            }
            Block::BlockQuote(children) => collect_heading_ids(children, seen),
            Block::List(list) => {
                for item in &list.items {
                    collect_heading_ids(&item.blocks, seen);
                }
            }
            _ => {}
        }
    }
}
