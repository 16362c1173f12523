//! Content loading errors.

use std::path::PathBuf;

use crate::store::StoreError;

/// Error type for content loading and lookup.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content root has no `index.md` / `index.mdx` (or does not exist).
    #[error("Content missing: no index.md or index.mdx found in {root}")]
    ContentMissing { root: String },

    /// No document resolves to the requested slug.
    #[error("Document not found: /{0}")]
    DocumentNotFound(String),

    /// Two documents share a slug.
    #[error("Duplicate document slug: /{0}")]
    DuplicateSlug(String),

    /// Frontmatter block could not be parsed.
    #[error("Invalid frontmatter in {}: {message}", path.display())]
    Frontmatter { path: PathBuf, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContentError {
    /// True for errors that mean "no such page".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound(_))
    }
}
