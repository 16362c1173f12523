//! Content store trait and error types.
//!
//! Provides the [`ContentStore`] trait for abstracting document discovery and
//! retrieval, along with [`StoreError`] for unified error handling across
//! backends.
//!
//! # Path Convention
//!
//! All paths exchanged with a store are **relative file paths** under the
//! content root (e.g., `"index.md"`, `"guides/intro.mdx"`). Mapping files to
//! slugs is the loader's job, not the store's.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// File extensions recognised as documents.
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Check whether a file name has a document extension.
#[must_use]
pub fn is_document_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

/// Check whether a path component is hidden (dot-prefixed).
#[must_use]
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path (e.g., escapes the content root).
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_path(path)
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            _ => StoreErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::InvalidPath => "Invalid path",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Content store abstraction for document discovery and retrieval.
///
/// Implementations are read-only and side-effect free, so a store can be
/// shared across threads and queried concurrently.
pub trait ContentStore: Send + Sync {
    /// List every document file (`.md` / `.mdx`) under the content root.
    ///
    /// Hidden entries are skipped. Reserved-prefix directories are filtered
    /// by the loader, not the store. A missing root yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if listing fails for a reason other than the
    /// root being absent.
    fn list(&self) -> Result<Vec<PathBuf>, StoreError>;

    /// Read the full source of a document file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &Path) -> Result<String, StoreError>;

    /// Check if a document file exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &Path) -> bool;

    /// Human-readable location of the content root, used in error messages.
    fn location(&self) -> String;
}
