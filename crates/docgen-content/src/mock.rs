//! Mock content store for testing.
//!
//! Provides [`MockContentStore`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::store::{ContentStore, StoreError, is_document_file, is_hidden};

/// In-memory content store.
///
/// Files live in a sorted map keyed by relative path. Use the builder methods
/// to seed test data, and [`insert`](Self::insert) / [`remove`](Self::remove)
/// to simulate edits after a site has been loaded.
///
/// # Example
///
/// ```ignore
/// use docgen_content::{ContentStore, MockContentStore};
///
/// let store = MockContentStore::new()
///     .with_file("index.md", "# Home")
///     .with_file("guides/setup.md", "---\ntitle: Setup\n---\n\nSteps.");
///
/// let files = store.list().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockContentStore {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MockContentStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given source.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), source.into());
    }

    /// Remove a file.
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path.as_ref());
    }
}

fn is_visible(path: &Path) -> bool {
    path.components().all(|c| match c {
        Component::Normal(name) => !is_hidden(&name.to_string_lossy()),
        _ => false,
    })
}

impl ContentStore for MockContentStore {
    fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        Ok(files
            .keys()
            .filter(|path| is_document_file(path) && is_visible(path))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(path).with_backend("Mock"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn location(&self) -> String {
        "memory".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorKind;

    #[test]
    fn test_list_filters_non_documents_and_hidden() {
        let store = MockContentStore::new()
            .with_file("index.md", "# Home")
            .with_file("guides/intro.mdx", "# Intro")
            .with_file("logo.svg", "<svg/>")
            .with_file(".drafts/wip.md", "");

        assert_eq!(
            store.list().unwrap(),
            vec![PathBuf::from("guides/intro.mdx"), PathBuf::from("index.md")]
        );
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let store = MockContentStore::new();

        let err = store.read(Path::new("missing.md")).unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_insert_and_remove() {
        let store = MockContentStore::new().with_file("a.md", "old");

        store.insert("a.md", "new");
        assert_eq!(store.read(Path::new("a.md")).unwrap(), "new");

        store.remove("a.md");
        assert!(!store.exists(Path::new("a.md")));
    }
}
