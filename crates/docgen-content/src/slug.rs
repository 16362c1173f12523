//! Document slugs.
//!
//! A [`Slug`] is the ordered sequence of path segments that identifies a
//! document's route. The empty sequence is the root (home) document.
//!
//! - `index.md` -> `[]`
//! - `guide.md` -> `["guide"]`
//! - `guides/index.mdx` -> `["guides"]`
//! - `guides/setup.md` -> `["guides", "setup"]`

use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::store::is_document_file;

/// File stem that makes a document stand for its directory.
pub const INDEX_STEM: &str = "index";

/// Ordered path segments identifying a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Slug(Vec<String>);

impl Slug {
    /// The root (home) slug.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a slug from segments, dropping empty ones.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        )
    }

    /// Parse a slug key (`"guides/setup"`). Leading, trailing and repeated
    /// slashes are ignored, so `""`, `"/"` and `[""]` all denote the root.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        Self::new(key.split('/'))
    }

    /// Derive a slug from a document path relative to the content root.
    ///
    /// Returns `None` for files without a document extension.
    #[must_use]
    pub fn from_source_path(path: &Path) -> Option<Self> {
        if !is_document_file(path) {
            return None;
        }

        let mut segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let last = segments.pop()?;
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem != INDEX_STEM {
            segments.push(stem);
        }

        Some(Self::new(segments))
    }

    /// Path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root (home) slug.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True for the root (home) slug.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Segments joined with `/` (`""` for the root).
    #[must_use]
    pub fn key(&self) -> String {
        self.0.join("/")
    }

    /// Absolute route (`"/"` for the root).
    #[must_use]
    pub fn href(&self) -> String {
        format!("/{}", self.key())
    }

    /// First segment, used to group documents into sections.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last segment.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Every non-empty prefix of this slug, shortest first (including itself).
    pub fn prefixes(&self) -> impl Iterator<Item = Slug> + '_ {
        (1..=self.0.len()).map(|n| Self(self.0[..n].to_vec()))
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.key()
    }
}

impl From<String> for Slug {
    fn from(key: String) -> Self {
        Self::parse(&key)
    }
}

impl From<&str> for Slug {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

/// Format a path segment as a display title.
///
/// Hyphens become spaces and each word is capitalised:
/// `"getting-started"` -> `"Getting Started"`.
#[must_use]
pub fn format_segment_title(segment: &str) -> String {
    let mut result = String::with_capacity(segment.len());
    for (i, word) in segment.split('-').enumerate() {
        if i > 0 {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
