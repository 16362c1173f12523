//! Context snippets around query matches.
//!
//! Offsets are counted in characters, never bytes, so multi-byte text is
//! never split inside a code point.

/// Default snippet length in characters.
pub const DEFAULT_SNIPPET_LENGTH: usize = 150;

/// Characters kept before the first match.
pub const CONTEXT_BEFORE: usize = 50;

/// Marker for truncated snippet ends.
const ELLIPSIS: &str = "...";

/// Character index of the first case-insensitive occurrence of `query`
/// (already normalised) in `text`.
fn find_char_index(text: &str, query: &str) -> Option<usize> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return None;
    }

    // Lowercased chars paired with the index of the char they came from.
    let lowered: Vec<(char, usize)> = text
        .chars()
        .enumerate()
        .flat_map(|(idx, c)| c.to_lowercase().map(move |lc| (lc, idx)))
        .collect();

    lowered
        .windows(needle.len())
        .find(|window| window.iter().map(|(c, _)| *c).eq(needle.iter().copied()))
        .map(|window| window[0].1)
}

/// Leading `max_len` characters of `text`, with a trailing marker when cut.
#[must_use]
pub fn leading_snippet(text: &str, max_len: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_len).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}

/// Excerpt of `text` around the first occurrence of `query`.
///
/// Keeps [`CONTEXT_BEFORE`] characters before the match and
/// `max_len - CONTEXT_BEFORE` after it, adding `...` only on the sides that
/// were cut. Returns `None` when the query does not occur contiguously.
#[must_use]
pub fn context_snippet(text: &str, query: &str, max_len: usize) -> Option<String> {
    let match_start = find_char_index(text, query)?;
    let total = text.chars().count();
    let query_len = query.chars().count();
    let after = max_len.saturating_sub(CONTEXT_BEFORE);

    let start = match_start.saturating_sub(CONTEXT_BEFORE);
    let end = (match_start + query_len + after).min(total);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(text.chars().skip(start).take(end - start));
    if end < total {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_context_snippet_short_text_has_no_markers() {
        let snippet = context_snippet("Install the CLI first.", "cli", 150);

        assert_eq!(snippet.as_deref(), Some("Install the CLI first."));
    }

    #[test]
    fn test_context_snippet_truncates_both_sides() {
        let text = format!("{}needle{}", "a".repeat(80), "b".repeat(200));

        let snippet = context_snippet(&text, "needle", 150).unwrap();

        let expected = format!("...{}needle{}...", "a".repeat(50), "b".repeat(100));
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_context_snippet_match_near_start() {
        let text = format!("needle{}", "b".repeat(200));

        let snippet = context_snippet(&text, "needle", 150).unwrap();

        assert!(!snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 6 + 100 + 3);
    }

    #[test]
    fn test_context_snippet_match_at_end() {
        let text = format!("{}needle", "a".repeat(60));

        let snippet = context_snippet(&text, "needle", 150).unwrap();

        assert_eq!(snippet, format!("...{}needle", "a".repeat(50)));
    }

    #[test]
    fn test_context_snippet_case_insensitive() {
        let snippet = context_snippet("Read the GUIDE.", "guide", 150);

        assert_eq!(snippet.as_deref(), Some("Read the GUIDE."));
    }

    #[test]
    fn test_context_snippet_multibyte() {
        let text = format!("{}ß needle {}", "é".repeat(70), "ü".repeat(120));

        let snippet = context_snippet(&text, "needle", 150).unwrap();

        assert!(snippet.starts_with("...é"));
        assert!(snippet.contains("needle"));
        assert!(snippet.ends_with("ü..."));
    }

    #[test]
    fn test_context_snippet_no_match() {
        assert_eq!(context_snippet("abc", "xyz", 150), None);
        assert_eq!(context_snippet("abc", "", 150), None);
    }

    #[test]
    fn test_leading_snippet() {
        assert_eq!(leading_snippet("short", 150), "short");
        assert_eq!(leading_snippet("abcdef", 3), "abc...");
        assert_eq!(leading_snippet("", 3), "");
    }
}
