//! Filesystem content store.
//!
//! Provides [`FsContentStore`] for reading documents from a local content
//! directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::store::{ContentStore, StoreError, StoreErrorKind, is_document_file, is_hidden};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem content store.
///
/// Walks the content directory recursively and reports every `.md` / `.mdx`
/// file, relative to the root.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use docgen_content::{ContentStore, FsContentStore};
///
/// let store = FsContentStore::new(PathBuf::from("content"));
/// let files = store.list()?;
/// ```
#[derive(Clone, Debug)]
pub struct FsContentStore {
    source_dir: PathBuf,
}

impl FsContentStore {
    /// Create a store rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Reject paths that could escape the content root.
    fn validate_path(path: &Path) -> Result<(), StoreError> {
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(StoreError::new(StoreErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn scan_directory(
        dir_path: &Path,
        base_path: &Path,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), StoreError> {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StoreError::io(e, Some(dir_path.to_path_buf())).with_backend(BACKEND));
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if is_hidden(&name) {
                continue;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            let rel_path = base_path.join(&*name);

            if is_dir {
                Self::scan_directory(&entry.path(), &rel_path, files)?;
            } else if is_document_file(&rel_path) {
                files.push(rel_path);
            }
        }

        Ok(())
    }
}

impl ContentStore for FsContentStore {
    fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        Self::scan_directory(&self.source_dir, Path::new(""), &mut files)?;
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        Self::validate_path(path)?;
        let full_path = self.source_dir.join(path);
        fs::read_to_string(&full_path)
            .map_err(|e| StoreError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        Self::validate_path(path).is_ok() && self.source_dir.join(path).is_file()
    }

    fn location(&self) -> String {
        self.source_dir.display().to_string()
    }
}
