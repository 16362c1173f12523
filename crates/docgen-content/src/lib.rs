//! Content loading for the docgen documentation generator.
//!
//! This crate turns a directory of markdown/MDX files into a flat collection
//! of parsed [`Document`]s. It provides:
//!
//! - [`ContentStore`] trait with `list()`, `read()`, and `exists()` methods
//! - [`FsContentStore`] implementation for the local filesystem
//! - [`MockContentStore`] for testing (behind `mock` feature flag)
//! - [`ContentLoader`] for scanning, slug resolution, and lookup
//! - Frontmatter parsing, markup stripping, and table-of-contents extraction
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docgen_content::{ContentLoader, FsContentStore, LoaderConfig, Slug};
//!
//! let store = Arc::new(FsContentStore::new(PathBuf::from("content")));
//! let loader = ContentLoader::new(store, LoaderConfig::default());
//! let documents = loader.load()?;
//! let guide = loader.lookup(&Slug::parse("guides/intro"))?;
//! ```

mod document;
mod error;
mod frontmatter;
mod fs;
mod loader;
mod markup;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod slug;
mod store;
mod toc;

pub use document::{Document, DocumentCollection, HOME_TITLE};
pub use error::ContentError;
pub use frontmatter::{DEFAULT_ORDER, Frontmatter, parse_frontmatter, split_frontmatter};
pub use fs::FsContentStore;
pub use loader::{ContentLoader, ExecutionMode, LoaderConfig};
pub use markup::{ReadingTime, WORDS_PER_MINUTE, extract_headings, strip_markup};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockContentStore;
pub use slug::{Slug, format_segment_title};
pub use store::{ContentStore, DOCUMENT_EXTENSIONS, StoreError, StoreErrorKind, is_document_file};
pub use toc::{TocEntry, extract_toc, heading_id};
