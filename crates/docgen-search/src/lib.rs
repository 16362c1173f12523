//! In-memory full-text search for docgen.
//!
//! [`SearchIndex::build`] indexes a document collection once; [`SearchIndex::query`]
//! answers case-insensitive substring and ordered-subsequence queries with
//! context snippets, ranking title matches first.
//!
//! The matching primitives in [`matching`] and [`snippet`] are pure functions
//! over normalised text, usable without an index.

pub mod matching;
pub mod snippet;

mod index;

pub use index::{
    DEFAULT_LIMIT, DEFAULT_MAX_DOCUMENT_BYTES, Field, FieldMatch, IndexBuildError, IndexOptions,
    SearchEntry, SearchIndex, SearchResult,
};
pub use matching::{MatchKind, contains_substring, is_ordered_subsequence};
pub use snippet::DEFAULT_SNIPPET_LENGTH;
