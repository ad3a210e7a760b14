//! Document content model.
//!
//! Markdown is parsed into a [`ContentTree`] of blocks and inlines. Headings
//! get identifiers, the annotator attaches anchors to list items, the linker
//! rewrites citations, and [`render_html`] writes the result.

mod ids;
mod inline;
mod node;
mod parse;
mod render;

pub use ids::{assign_heading_ids, heading_id};
pub use inline::parse_inlines;
pub use node::{
    collect_block_text, plain_text, Block, ContentTree, ExternalLink, Heading, Inline, List,
    ListItem, Table,
};
pub use parse::parse_markdown;
pub use render::{escape_html, render_html};
