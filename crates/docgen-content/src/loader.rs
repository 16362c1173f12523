//! Content loading.
//!
//! [`ContentLoader`] turns the files of a [`ContentStore`] into a
//! [`DocumentCollection`]:
//!
//! 1. Require a root `index.md` / `index.mdx`
//! 2. List document files, dropping hidden entries and reserved-prefix directories
//! 3. Map files to slugs, resolving collisions with lookup precedence
//! 4. Parse documents in parallel, skipping ones with broken frontmatter
//! 5. Drop drafts in production mode

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::document::{Document, DocumentCollection};
use crate::error::ContentError;
use crate::slug::{INDEX_STEM, Slug};
use crate::store::{ContentStore, is_hidden};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Whether drafts are visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Drafts are loaded.
    #[default]
    Development,
    /// Drafts are excluded from scans and lookups.
    Production,
}

impl ExecutionMode {
    /// Pick the mode from a `production` flag.
    #[must_use]
    pub fn from_production(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Development
        }
    }
}

/// Configuration for [`ContentLoader`].
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    pub mode: ExecutionMode,
    /// Directories whose name starts with this prefix are skipped.
    pub reserved_prefix: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            reserved_prefix: "_".to_owned(),
        }
    }
}

/// Loads documents from a content store.
pub struct ContentLoader {
    store: Arc<dyn ContentStore>,
    config: LoaderConfig,
}

impl ContentLoader {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, config: LoaderConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Check that the content root has an index document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ContentMissing`] if neither `index.md` nor
    /// `index.mdx` exists at the root.
    pub fn validate(&self) -> Result<(), ContentError> {
        let has_index = candidate_paths(&Slug::root())
            .iter()
            .any(|path| self.store.exists(path));

        if has_index {
            Ok(())
        } else {
            Err(ContentError::ContentMissing {
                root: self.store.location(),
            })
        }
    }

    /// Scan the store and parse every visible document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ContentMissing`] if the root index is absent,
    /// or [`ContentError::Store`] if listing fails.
    pub fn load(&self) -> Result<DocumentCollection, ContentError> {
        let start = Instant::now();
        self.validate()?;

        let files = self.store.list()?;
        let file_count = files.len();
        let candidates = self.resolve_slugs(files);

        let mut documents: Vec<Document> = candidates
            .into_par_iter()
            .filter_map(|(slug, path)| match self.read_document(slug, &path) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping document");
                    None
                }
            })
            .collect();

        if self.config.mode == ExecutionMode::Production {
            documents.retain(|doc| !doc.is_draft());
        }
        documents.sort_by(|a, b| a.slug.cmp(&b.slug));

        tracing::info!(
            file_count,
            document_count = documents.len(),
            elapsed_ms = elapsed_ms(start),
            "Content loaded"
        );

        DocumentCollection::from_documents(documents)
    }

    /// Resolve a single document by slug.
    ///
    /// Probes `{slug}.md`, `{slug}.mdx`, `{slug}/index.md`, `{slug}/index.mdx`
    /// in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DocumentNotFound`] if no candidate exists, the
    /// slug is not addressable, or the document is a draft in production.
    /// Returns [`ContentError::Frontmatter`] if the file exists but its
    /// frontmatter is malformed.
    pub fn lookup(&self, slug: &Slug) -> Result<Document, ContentError> {
        if !Self::is_addressable(slug) {
            return Err(ContentError::DocumentNotFound(slug.key()));
        }

        let path = candidate_paths(slug)
            .into_iter()
            .find(|path| self.is_visible(path) && self.store.exists(path))
            .ok_or_else(|| ContentError::DocumentNotFound(slug.key()))?;

        let doc = self.read_document(slug.clone(), &path)?;
        if self.config.mode == ExecutionMode::Production && doc.is_draft() {
            return Err(ContentError::DocumentNotFound(slug.key()));
        }
        Ok(doc)
    }

    fn read_document(&self, slug: Slug, path: &Path) -> Result<Document, ContentError> {
        let source = self.store.read(path)?;
        Document::parse(slug, path, &source)
    }

    fn is_reserved(&self, name: &str) -> bool {
        name.starts_with(&self.config.reserved_prefix)
    }

    /// Reject slugs with hidden, relative, or backslash segments.
    fn is_addressable(slug: &Slug) -> bool {
        slug.segments()
            .iter()
            .all(|segment| !is_hidden(segment) && !segment.contains('\\'))
    }

    /// Whether a store path can hold a document.
    ///
    /// Applies to scans and lookups alike: no component may be hidden and
    /// no directory may start with the reserved prefix. The file name
    /// itself may.
    fn is_visible(&self, path: &Path) -> bool {
        let file_visible = path
            .file_name()
            .is_some_and(|name| !is_hidden(&name.to_string_lossy()));
        let dirs_visible = path.parent().is_none_or(|parent| {
            parent.components().all(|c| match c {
                Component::Normal(name) => {
                    let name = name.to_string_lossy();
                    !is_hidden(&name) && !self.is_reserved(&name)
                }
                _ => false,
            })
        });
        file_visible && dirs_visible
    }

    /// Map listed files to slugs, keeping the highest-precedence file when
    /// several collapse to the same slug.
    fn resolve_slugs(&self, files: Vec<PathBuf>) -> Vec<(Slug, PathBuf)> {
        let mut by_slug: HashMap<Slug, (usize, PathBuf)> = HashMap::new();

        for path in files {
            if !self.is_visible(&path) {
                continue;
            }
            let Some(slug) = Slug::from_source_path(&path) else {
                continue;
            };
            let rank = precedence(&slug, &path);

            match by_slug.get_mut(&slug) {
                Some((existing_rank, existing)) => {
                    let (kept, dropped) = if rank < *existing_rank {
                        let dropped = std::mem::replace(existing, path);
                        *existing_rank = rank;
                        (existing.clone(), dropped)
                    } else {
                        (existing.clone(), path)
                    };
                    tracing::warn!(
                        slug = %slug,
                        kept = %kept.display(),
                        ignored = %dropped.display(),
                        "Multiple files resolve to the same slug"
                    );
                }
                None => {
                    by_slug.insert(slug, (rank, path));
                }
            }
        }

        by_slug
            .into_iter()
            .map(|(slug, (_, path))| (slug, path))
            .collect()
    }
}

/// Candidate file paths for a slug, in lookup order.
fn candidate_paths(slug: &Slug) -> Vec<PathBuf> {
    let base: PathBuf = slug.segments().iter().collect();

    let mut candidates = Vec::with_capacity(4);
    if let Some(last) = slug.last() {
        candidates.push(base.with_file_name(format!("{last}.md")));
        candidates.push(base.with_file_name(format!("{last}.mdx")));
    }
    candidates.push(base.join(format!("{INDEX_STEM}.md")));
    candidates.push(base.join(format!("{INDEX_STEM}.mdx")));
    candidates
}

/// Position of `path` in the lookup order for `slug` (lower wins).
fn precedence(slug: &Slug, path: &Path) -> usize {
    candidate_paths(slug)
        .iter()
        .position(|candidate| candidate == path)
        .unwrap_or(usize::MAX)
}


#[cfg(test)]
mod fs_tests {
    use std::fs;

    use super::*;
    use crate::fs::FsContentStore;

    #[test]
    fn test_load_from_filesystem() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("index.md"), "---\ntitle: Home\n---\n").unwrap();
        fs::create_dir(temp_dir.path().join("guides")).unwrap();
        fs::write(temp_dir.path().join("guides/intro.md"), "# Intro").unwrap();

        let loader = ContentLoader::new(
            Arc::new(FsContentStore::new(temp_dir.path().to_path_buf())),
            LoaderConfig::default(),
        );
        let collection = loader.load().unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.get_by_key("guides/intro").map(|d| d.source_path.clone()),
            Some(PathBuf::from("guides/intro.md"))
        );
    }

    #[test]
    fn test_filesystem_scan_and_lookup_agree() {
        let temp_dir = tempfile::tempdir().unwrap();
        for (rel, content) in [
            ("index.md", "Home"),
            ("dist.md", "Dist"),
            ("_notes.md", "Notes"),
            ("guides/build/setup.md", "Setup"),
            ("vendor/intro.md", "Vendor"),
            (".hidden/secret.md", "Secret"),
        ] {
            let path = temp_dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let loader = ContentLoader::new(
            Arc::new(FsContentStore::new(temp_dir.path().to_path_buf())),
            LoaderConfig::default(),
        );

        let collection = loader.load().unwrap();
        let scanned: Vec<String> = collection.iter().map(|d| d.slug.key()).collect();

        assert_eq!(
            scanned,
            vec!["", "_notes", "dist", "guides/build/setup", "vendor/intro"]
        );
        for key in &scanned {
            assert!(loader.lookup(&Slug::parse(key)).is_ok(), "{key} should resolve");
        }
        assert!(
            loader
                .lookup(&Slug::parse(".hidden/secret"))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_missing_content_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(
            Arc::new(FsContentStore::new(temp_dir.path().join("content"))),
            LoaderConfig::default(),
        );

        let err = loader.load().unwrap_err();

        assert!(matches!(err, ContentError::ContentMissing { .. }));
    }
}
