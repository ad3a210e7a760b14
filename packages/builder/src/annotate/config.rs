//! Matcher configuration for EU legal documents.

use super::matcher::{
    AnnexParagraphMatcher, ParagraphMatcher, PointMatcher, RecitalMatcher, SubpointMatcher,
};
use super::registry::MatcherRegistry;

/// Create the matcher registry for EU regulation structure.
///
/// ```text
/// recitals
/// └── (n) recital
///     └── (a) point
/// article
/// ├── 1. paragraph
/// │   └── (a) point
/// │       └── (i) subpoint
/// └── (a) point
/// annex
/// └── 1. annex paragraph
///     └── (a) point
/// ```
///
/// Points are tried before subpoints, so an item starting `(i)` is a point.
#[must_use]
pub fn create_eu_matcher_registry() -> MatcherRegistry {
    let mut registry = MatcherRegistry::new();

    registry.register(RecitalMatcher);
    registry.register(ParagraphMatcher);
    registry.register(AnnexParagraphMatcher);
    registry.register(PointMatcher);
    registry.register(SubpointMatcher);

    registry
}
