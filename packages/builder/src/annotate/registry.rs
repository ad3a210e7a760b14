//! Matcher registry for list item annotation.

use super::matcher::UnitMatcher;
use super::types::{Anchor, ItemContext};
use crate::types::UnitKind;

/// Ordered collection of unit matchers. The first matcher that accepts an
/// item decides its anchor.
pub struct MatcherRegistry {
    matchers: Vec<Box<dyn UnitMatcher>>,
}

impl MatcherRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Register a matcher after the existing ones.
    pub fn register(&mut self, matcher: impl UnitMatcher + 'static) {
        self.matchers.push(Box::new(matcher));
    }

    /// Run the matchers in registration order.
    #[must_use]
    pub fn match_item(&self, item: &ItemContext<'_>) -> Option<Anchor> {
        self.matchers.iter().find_map(|m| m.match_item(item))
    }

    /// Kinds handled, in registration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<UnitKind> {
        self.matchers.iter().map(|m| m.kind()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}
