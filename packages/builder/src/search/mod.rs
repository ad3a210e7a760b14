//! Full-text search index.
//!
//! Sections and terminology entries are merged into [`SearchDocument`]s and
//! indexed per field. The serialized [`SearchIndex`] is what the client
//! loads; [`SearchIndex::search`] ranks with the same field boosts.

mod builder;
mod index;
mod schema;
mod tokenize;

pub use builder::{build_search_index, check_terminology};
pub use index::{SearchHit, SearchIndex, INDEX_FORMAT_VERSION};
pub use schema::{FieldBoosts, SearchDocument, SearchField, TERM_TYPE};
pub use tokenize::tokenize;
