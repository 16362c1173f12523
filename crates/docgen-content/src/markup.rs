//! Markup stripping and heading extraction.
//!
//! Produces the plain text used for search and reading-time estimates. The
//! transformations are regex based and deliberately lossy: the result is for
//! matching, not for display.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Words per minute for reading-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---.*?---").expect("invalid frontmatter regex"));

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("invalid fenced code regex"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("invalid inline code regex"));

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("invalid image regex"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("invalid link regex"));

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+").expect("invalid heading marker regex"));

static BOLD_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("invalid bold regex"));

static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("invalid italic regex"));

static BOLD_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("invalid bold regex"));

static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]+)_").expect("invalid italic regex"));

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid html tag regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,3}[ \t]+(.+)$").expect("invalid heading regex"));

/// Strip markdown/MDX markup, leaving space-separated plain text.
#[must_use]
pub fn strip_markup(markdown: &str) -> String {
    let text = FRONTMATTER.replace(markdown, "");
    let text = FENCED_CODE.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING_MARKER.replace_all(&text, "");
    let text = BOLD_STARS.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = BOLD_UNDERSCORES.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_owned()
}

/// Extract level 1-3 heading texts, ignoring fenced code blocks.
#[must_use]
pub fn extract_headings(markdown: &str) -> Vec<String> {
    let text = FENCED_CODE.replace_all(markdown, "");
    HEADING
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Estimated reading time of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadingTime {
    /// Words in the stripped text.
    pub words: usize,
    /// Minutes at [`WORDS_PER_MINUTE`], rounded up, at least 1.
    pub minutes: usize,
}

impl ReadingTime {
    /// Estimate reading time from plain text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let words = text.split_whitespace().count();
        Self {
            words,
            minutes: words.div_ceil(WORDS_PER_MINUTE).max(1),
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}
