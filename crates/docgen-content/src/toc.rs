//! Table of contents extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("invalid non-word regex"));

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("invalid separator regex"));

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (2 or 3).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Anchor ID for a heading title.
///
/// Lowercases, drops characters other than word characters, whitespace and
/// `-`, then replaces whitespace/underscore runs with `-`.
#[must_use]
pub fn heading_id(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let cleaned = NON_WORD.replace_all(&lower, "");
    SEPARATOR_RUN.replace_all(&cleaned, "-").into_owned()
}

/// Extract `##` and `###` headings from a markdown body.
///
/// Repeated IDs get a numeric suffix (`setup`, `setup-1`, ...).
#[must_use]
pub fn extract_toc(markdown: &str) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = match level {
                    HeadingLevel::H2 => Some((2, String::new())),
                    HeadingLevel::H3 => Some((3, String::new())),
                    _ => None,
                };
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = current.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    let base = heading_id(&title);
                    let count = seen.entry(base.clone()).or_insert(0);
                    let id = if *count == 0 {
                        base
                    } else {
                        format!("{base}-{count}")
                    };
                    *count += 1;
                    toc.push(TocEntry {
                        level,
                        title: title.trim().to_owned(),
                        id,
                    });
                }
            }
            _ => {}
        }
    }

    toc
}
