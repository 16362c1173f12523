//! Search index over a document collection.
//!
//! Each document becomes one [`SearchEntry`] holding its title, description,
//! headings and stripped body, both as-is and normalised for matching. The
//! index is immutable: content changes require a fresh [`SearchIndex::build`].

use std::time::Instant;

use docgen_content::{Document, Slug};
use serde::Serialize;

use crate::matching::{MatchKind, match_field, normalize, normalize_query};
use crate::snippet::{DEFAULT_SNIPPET_LENGTH, context_snippet, leading_snippet};

/// Default number of results returned by a query.
pub const DEFAULT_LIMIT: usize = 10;

/// Default cap on a document's raw body size.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 2 * 1024 * 1024;

/// A document that could not be indexed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexBuildError {
    #[error("Document /{id} has no title")]
    MissingTitle { id: String },

    #[error("Document /{id} body is {size} bytes, exceeding the {limit} byte limit")]
    OversizedBody { id: String, size: usize, limit: usize },
}

/// Index construction options.
#[derive(Clone, Debug)]
pub struct IndexOptions {
    /// Snippet length in characters.
    pub snippet_length: usize,
    /// Documents with a larger raw body are skipped.
    pub max_document_bytes: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// Indexed fields, in descending weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    Heading,
    Content,
}

/// One indexed document.
#[derive(Clone, Debug)]
pub struct SearchEntry {
    /// Slug key.
    pub id: String,
    pub slug: Slug,
    pub title: String,
    pub description: Option<String>,
    /// Level 1-3 headings.
    pub headings: Vec<String>,
    /// Body with markup stripped.
    pub body: String,
    normalized: NormalizedFields,
}

#[derive(Clone, Debug)]
struct NormalizedFields {
    title: String,
    description: Option<String>,
    headings: Vec<String>,
    body: String,
}

impl SearchEntry {
    fn from_document(doc: &Document, options: &IndexOptions) -> Result<Self, IndexBuildError> {
        let id = doc.slug.key();

        let title = doc
            .frontmatter
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| IndexBuildError::MissingTitle { id: id.clone() })?
            .to_owned();

        let size = doc.content.len();
        if size > options.max_document_bytes {
            return Err(IndexBuildError::OversizedBody {
                id,
                size,
                limit: options.max_document_bytes,
            });
        }

        let description = doc.description().map(str::to_owned);
        let headings = doc.headings();
        let body = doc.derived_content();

        let normalized = NormalizedFields {
            title: normalize(&title),
            description: description.as_deref().map(normalize),
            headings: headings.iter().map(|h| normalize(h)).collect(),
            body: normalize(&body),
        };

        Ok(Self {
            id,
            slug: doc.slug.clone(),
            title,
            description,
            headings,
            body,
            normalized,
        })
    }
}

/// A field that matched a query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    #[serde(rename = "type")]
    pub field: Field,
    /// Field text, or a snippet of it for long fields.
    pub text: String,
}

/// A ranked query result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Slug key.
    pub id: String,
    /// Absolute route.
    pub href: String,
    pub title: String,
    /// Description, empty when the document has none.
    pub description: String,
    pub snippet: String,
    /// First heading that matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_heading: Option<String>,
    pub matches: Vec<FieldMatch>,
}

impl SearchResult {
    /// True if the title field matched.
    #[must_use]
    pub fn has_title_match(&self) -> bool {
        self.matches.iter().any(|m| m.field == Field::Title)
    }
}

/// Immutable in-memory search index.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    skipped: Vec<IndexBuildError>,
    snippet_length: usize,
}

impl SearchIndex {
    /// Index every document, skipping those that fail with an
    /// [`IndexBuildError`]. Entry order follows the input order.
    pub fn build<'a, I>(documents: I, options: &IndexOptions) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let start = Instant::now();
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for doc in documents {
            match SearchEntry::from_document(doc, options) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping document in search index");
                    skipped.push(e);
                }
            }
        }

        tracing::info!(
            entry_count = entries.len(),
            skipped_count = skipped.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Search index built"
        );

        Self {
            entries,
            skipped,
            snippet_length: options.snippet_length,
        }
    }

    /// Documents rejected during the build.
    #[must_use]
    pub fn skipped(&self) -> &[IndexBuildError] {
        &self.skipped
    }

    #[must_use]
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run a query.
    ///
    /// Matching is case-insensitive substring containment with an
    /// ordered-subsequence fallback, per field. Results with a title match
    /// come first; otherwise index order is kept. Blank queries return
    /// nothing.
    #[must_use]
    pub fn query(&self, text: &str, limit: usize) -> Vec<SearchResult> {
        let Some(query) = normalize_query(text) else {
            return Vec::new();
        };

        let (mut results, rest): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .filter_map(|entry| self.evaluate(entry, &query))
            .partition(SearchResult::has_title_match);
        results.extend(rest);
        results.truncate(limit);
        results
    }

    fn evaluate(&self, entry: &SearchEntry, query: &str) -> Option<SearchResult> {
        let fields = &entry.normalized;
        let mut matches = Vec::new();

        if match_field(&fields.title, query).is_some() {
            matches.push(FieldMatch {
                field: Field::Title,
                text: entry.title.clone(),
            });
        }

        let description_match = entry
            .description
            .as_deref()
            .zip(fields.description.as_deref())
            .and_then(|(raw, norm)| match_field(norm, query).map(|kind| (raw, kind)));
        if let Some((raw, kind)) = description_match {
            matches.push(FieldMatch {
                field: Field::Description,
                text: self.field_snippet(raw, query, kind),
            });
        }

        let mut matched_heading: Option<(&str, MatchKind)> = None;
        for (raw, norm) in entry.headings.iter().zip(&fields.headings) {
            if let Some(kind) = match_field(norm, query) {
                let better = matched_heading.is_none_or(|(_, best)| kind < best);
                if better {
                    matched_heading = Some((raw, kind));
                }
                if kind == MatchKind::Substring {
                    break;
                }
            }
        }
        if let Some((heading, _)) = matched_heading {
            matches.push(FieldMatch {
                field: Field::Heading,
                text: heading.to_owned(),
            });
        }

        let content_match = match_field(&fields.body, query);
        if let Some(kind) = content_match {
            matches.push(FieldMatch {
                field: Field::Content,
                text: self.field_snippet(&entry.body, query, kind),
            });
        }

        if matches.is_empty() {
            return None;
        }

        Some(SearchResult {
            id: entry.id.clone(),
            href: entry.slug.href(),
            title: entry.title.clone(),
            description: entry.description.clone().unwrap_or_default(),
            snippet: self.result_snippet(entry, query),
            matched_heading: matched_heading.map(|(h, _)| h.to_owned()),
            matches,
        })
    }

    fn field_snippet(&self, text: &str, query: &str, kind: MatchKind) -> String {
        match kind {
            MatchKind::Substring => context_snippet(text, query, self.snippet_length)
                .unwrap_or_else(|| leading_snippet(text, self.snippet_length)),
            MatchKind::Subsequence => leading_snippet(text, self.snippet_length),
        }
    }

    /// Snippet centred on the first body occurrence, then the description,
    /// falling back to leading text.
    fn result_snippet(&self, entry: &SearchEntry, query: &str) -> String {
        context_snippet(&entry.body, query, self.snippet_length)
            .or_else(|| {
                entry
                    .description
                    .as_deref()
                    .and_then(|d| context_snippet(d, query, self.snippet_length))
            })
            .unwrap_or_else(|| {
                let lead = if entry.body.is_empty() {
                    entry.description.as_deref().unwrap_or_default()
                } else {
                    &entry.body
                };
                leading_snippet(lead, self.snippet_length)
            })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use docgen_content::Frontmatter;
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(key: &str, source: &str) -> Document {
        Document::parse(Slug::parse(key), Path::new("x.md"), source).unwrap()
    }

    fn scenario() -> Vec<Document> {
        vec![
            doc("", "---\ntitle: Welcome\n---\nStart here to learn the basics."),
            doc(
                "getting-started",
                "---\ntitle: Getting Started\norder: 1\n---\n## Install\n\nInstall the tool.",
            ),
            doc(
                "guides/intro",
                "---\ntitle: Intro\norder: 1\ndescription: First steps\n---\nAn introduction.",
            ),
            doc(
                "guides/advanced",
                "---\ntitle: Advanced\norder: 2\n---\n## Tuning\n\nAdvanced tuning options.",
            ),
        ]
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_start_query_ranks_title_match_first() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        let results = index.query("start", DEFAULT_LIMIT);

        assert_eq!(results[0].id, "getting-started");
        assert!(results[0].has_title_match());
        assert!(ids(&results).contains(&""));
    }

    #[test]
    fn test_title_matches_sort_before_others() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        let results = index.query("advanced", DEFAULT_LIMIT);
        let first_non_title = results
            .iter()
            .position(|r| !r.has_title_match())
            .unwrap_or(results.len());

        assert!(results[..first_non_title].iter().all(SearchResult::has_title_match));
        assert!(results[first_non_title..].iter().all(|r| !r.has_title_match()));
        assert_eq!(results[0].id, "guides/advanced");
    }

    #[test]
    fn test_exact_title_query_returns_document() {
        let documents = scenario();
        let index = SearchIndex::build(&documents, &IndexOptions::default());

        for document in &documents {
            let results = index.query(document.title(), usize::MAX);
            assert!(
                ids(&results).contains(&document.slug.key().as_str()),
                "{} missing from results",
                document.title()
            );
        }
    }

    #[test]
    fn test_fuzzy_subsequence_match() {
        let documents = vec![
            doc("", "Home"),
            doc("docs", "---\ntitle: Getting Docs\n---\nzzz"),
        ];
        let index = SearchIndex::build(&documents, &IndexOptions::default());

        let results = index.query("gdoc", DEFAULT_LIMIT);

        assert_eq!(ids(&results), vec!["docs"]);
        assert_eq!(results[0].matches[0].field, Field::Title);
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        assert!(index.query("", DEFAULT_LIMIT).is_empty());
        assert!(index.query("   \t", DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        assert_eq!(index.query("e", 2).len(), 2);
        assert!(index.query("e", 0).is_empty());
    }

    #[test]
    fn test_result_details() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        let results = index.query("tuning", DEFAULT_LIMIT);
        let result = &results[0];

        assert_eq!(result.id, "guides/advanced");
        assert_eq!(result.href, "/guides/advanced");
        assert_eq!(result.matched_heading.as_deref(), Some("Tuning"));
        assert_eq!(result.snippet, "Tuning Advanced tuning options.");
        let fields: Vec<Field> = result.matches.iter().map(|m| m.field).collect();
        assert_eq!(fields, vec![Field::Heading, Field::Content]);
    }

    #[test]
    fn test_snippet_centres_on_final_sigma_match() {
        let body = format!("{} ΟΔΟΣ {}", "a".repeat(80), "b".repeat(200));
        let docs = vec![doc("greek", &format!("---\ntitle: Greek\n---\n{body}"))];
        let index = SearchIndex::build(&docs, &IndexOptions::default());

        let results = index.query("ΟΔΟΣ", DEFAULT_LIMIT);

        assert_eq!(ids(&results), vec!["greek"]);
        let snippet = &results[0].snippet;
        assert!(snippet.starts_with("..."), "{snippet}");
        assert!(snippet.contains("ΟΔΟΣ"), "{snippet}");
    }

    #[test]
    fn test_description_snippet_when_body_misses() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        let results = index.query("first steps", DEFAULT_LIMIT);
        let intro = results.iter().find(|r| r.id == "guides/intro").unwrap();

        assert_eq!(intro.description, "First steps");
        assert_eq!(intro.snippet, "First steps");
    }

    #[test]
    fn test_query_is_case_and_whitespace_insensitive() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());

        let a = index.query("GETTING   started", DEFAULT_LIMIT);
        let b = index.query("getting started", DEFAULT_LIMIT);

        assert_eq!(a, b);
        assert_eq!(a[0].id, "getting-started");
    }

    #[test]
    fn test_build_skips_oversized_documents() {
        let documents = vec![
            doc("", "Home"),
            doc("big", &"word ".repeat(100)),
            doc("small", "tiny"),
        ];
        let options = IndexOptions {
            max_document_bytes: 64,
            ..IndexOptions::default()
        };

        let index = SearchIndex::build(&documents, &options);

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.skipped(),
            [IndexBuildError::OversizedBody {
                id: "big".to_owned(),
                size: 500,
                limit: 64,
            }]
        );
        assert!(index.query("tiny", DEFAULT_LIMIT).len() == 1);
    }

    #[test]
    fn test_build_skips_untitled_documents() {
        let untitled = Document {
            slug: Slug::parse("untitled"),
            frontmatter: Frontmatter::default(),
            content: "Body".to_owned(),
            source_path: "untitled.md".into(),
        };
        let documents = vec![doc("", "Home"), untitled];

        let index = SearchIndex::build(&documents, &IndexOptions::default());

        assert_eq!(index.len(), 1);
        assert!(matches!(
            index.skipped()[0],
            IndexBuildError::MissingTitle { ref id } if id == "untitled"
        ));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let index = SearchIndex::build(&scenario(), &IndexOptions::default());
        let results = index.query("tuning", 1);

        let json = serde_json::to_value(&results[0]).unwrap();

        assert_eq!(json["matchedHeading"], "Tuning");
        assert_eq!(json["matches"][0]["type"], "heading");
    }
}
