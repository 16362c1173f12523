//! YAML frontmatter parsing.
//!
//! A document may start with a block delimited by `---` lines. The block is
//! parsed as YAML into [`Frontmatter`]; everything after the closing
//! delimiter is the document body.

use serde::{Deserialize, Serialize};

/// Sort position used when a document declares no `order`.
pub const DEFAULT_ORDER: i64 = 999;

/// Frontmatter delimiter line.
const DELIMITER: &str = "---";

/// Structured metadata declared at the top of a document.
///
/// Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontmatter {
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short summary used in search results and feeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sort position among siblings (lower first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Drafts are excluded in production.
    pub draft: bool,
    /// Explicit `published: false` hides a page from prev/next navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// Publication date (`YYYY-MM-DD` or RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Last update date (`YYYY-MM-DD` or RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Navigation icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Frontmatter {
    /// Effective sort order.
    #[must_use]
    pub fn order(&self) -> i64 {
        self.order.unwrap_or(DEFAULT_ORDER)
    }

    /// True unless `published: false` is declared.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.published != Some(false)
    }
}

/// Split a document source into its frontmatter block and body.
///
/// Returns `(None, source)` when the source does not open with a `---` line
/// or the block is never closed.
#[must_use]
pub fn split_frontmatter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some(rest) = source.strip_prefix(DELIMITER).and_then(|r| {
        r.strip_prefix("\r\n")
            .or_else(|| r.strip_prefix('\n'))
    }) else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, source)
}

/// Parse a frontmatter block. An empty block yields the defaults.
///
/// # Errors
///
/// Returns an error if the block is malformed YAML or a field has the wrong
/// type.
pub fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(yaml)
}
