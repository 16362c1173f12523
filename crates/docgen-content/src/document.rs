//! Parsed documents and the document collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ContentError;
use crate::frontmatter::{Frontmatter, parse_frontmatter, split_frontmatter};
use crate::markup::{ReadingTime, extract_headings, strip_markup};
use crate::slug::{Slug, format_segment_title};
use crate::toc::{TocEntry, extract_toc};

/// Title used for the root document when frontmatter declares none.
pub const HOME_TITLE: &str = "Home";

/// A parsed content document.
///
/// Immutable once constructed. `frontmatter.title` is always populated,
/// falling back to the formatted last slug segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Route segments.
    pub slug: Slug,
    /// Parsed frontmatter.
    pub frontmatter: Frontmatter,
    /// Body with frontmatter removed, markup retained.
    pub content: String,
    /// Source file relative to the content root.
    pub source_path: PathBuf,
}

impl Document {
    /// Parse a document from its full source text.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Frontmatter`] if the frontmatter block is
    /// malformed.
    pub fn parse(slug: Slug, source_path: &Path, source: &str) -> Result<Self, ContentError> {
        let (yaml, body) = split_frontmatter(source);
        let mut frontmatter = match yaml {
            Some(yaml) => parse_frontmatter(yaml).map_err(|e| ContentError::Frontmatter {
                path: source_path.to_path_buf(),
                message: e.to_string(),
            })?,
            None => Frontmatter::default(),
        };

        let has_title = frontmatter
            .title
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if !has_title {
            frontmatter.title = Some(fallback_title(&slug));
        }

        Ok(Self {
            slug,
            frontmatter,
            content: body.to_owned(),
            source_path: source_path.to_path_buf(),
        })
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.frontmatter.title.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.frontmatter.description.as_deref()
    }

    /// Effective sort order.
    #[must_use]
    pub fn order(&self) -> i64 {
        self.frontmatter.order()
    }

    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.frontmatter.draft
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.frontmatter.is_published()
    }

    /// Absolute route of the document.
    #[must_use]
    pub fn href(&self) -> String {
        self.slug.href()
    }

    /// Body with markup stripped.
    #[must_use]
    pub fn derived_content(&self) -> String {
        strip_markup(&self.content)
    }

    /// Level 1-3 heading texts.
    #[must_use]
    pub fn headings(&self) -> Vec<String> {
        extract_headings(&self.content)
    }

    /// `##` / `###` table of contents.
    #[must_use]
    pub fn toc(&self) -> Vec<TocEntry> {
        extract_toc(&self.content)
    }

    #[must_use]
    pub fn reading_time(&self) -> ReadingTime {
        ReadingTime::from_text(&self.derived_content())
    }
}

fn fallback_title(slug: &Slug) -> String {
    slug.last()
        .map_or_else(|| HOME_TITLE.to_owned(), format_segment_title)
}

/// Flat, deduplicated set of documents addressable by slug.
#[derive(Clone, Debug, Default)]
pub struct DocumentCollection {
    documents: Vec<Document>,
    by_key: HashMap<String, usize>,
}

impl DocumentCollection {
    /// Build a collection, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DuplicateSlug`] if two documents share a slug.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, ContentError> {
        let mut by_key = HashMap::with_capacity(documents.len());
        for (idx, doc) in documents.iter().enumerate() {
            if by_key.insert(doc.slug.key(), idx).is_some() {
                return Err(ContentError::DuplicateSlug(doc.slug.key()));
            }
        }
        Ok(Self { documents, by_key })
    }

    #[must_use]
    pub fn get(&self, slug: &Slug) -> Option<&Document> {
        self.get_by_key(&slug.key())
    }

    /// Look up by slug key (`"guides/intro"`, `""` for the root).
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> Option<&Document> {
        self.by_key.get(key).map(|&idx| &self.documents[idx])
    }

    /// The root (home) document, if present.
    #[must_use]
    pub fn root(&self) -> Option<&Document> {
        self.get_by_key("")
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
