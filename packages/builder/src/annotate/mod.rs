//! Document structure annotation.
//!
//! Attaches stable anchor identifiers to the paragraphs, points, subpoints,
//! recitals and annex paragraphs of a parsed document, for example
//! `article-5-para-3-point-a`. Recognition of each unit kind is a separate
//! [`UnitMatcher`] strategy held in a [`MatcherRegistry`].

mod config;
mod engine;
mod matcher;
mod registry;
mod types;
mod units;

pub use config::create_eu_matcher_registry;
pub use engine::Annotator;
pub use matcher::{
    AnnexParagraphMatcher, ParagraphMatcher, PointMatcher, RecitalMatcher, SubpointMatcher,
    UnitMatcher,
};
pub use registry::MatcherRegistry;
pub use types::{
    Anchor, AnnotationStats, ItemContext, ListShape, Ordinal, ScopeEntry, ScopeKind, ScopeStack,
};
pub use units::collect_units;
