//! Case-insensitive text matching.
//!
//! All functions operate on text already passed through [`normalize`].

/// Longest query (in characters) that is matched; the rest is dropped.
pub const MAX_QUERY_CHARS: usize = 200;

/// How a field matched a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    /// The query occurs contiguously.
    Substring,
    /// Every query character occurs in order, with gaps.
    Subsequence,
}

/// Lowercase text for comparison, one character at a time.
///
/// Context-free mapping (a final `Σ` becomes `σ`, not `ς`), the same one
/// snippet extraction uses to locate matches in the original text.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Normalise a raw query: trim, collapse whitespace runs, cap length,
/// lowercase. Returns `None` when nothing is left to match.
#[must_use]
pub fn normalize_query(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let capped: String = collapsed.chars().take(MAX_QUERY_CHARS).collect();
    Some(normalize(capped.trim_end()))
}

/// True if `needle` occurs contiguously in `haystack`.
#[must_use]
pub fn contains_substring(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

/// True if every character of `needle` appears in `haystack` in the same
/// relative order. The empty needle is a subsequence of everything.
#[must_use]
pub fn is_ordered_subsequence(haystack: &str, needle: &str) -> bool {
    let mut wanted = needle.chars().peekable();
    for c in haystack.chars() {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

/// Match a normalised field against a normalised query.
#[must_use]
pub fn match_field(field: &str, query: &str) -> Option<MatchKind> {
    if contains_substring(field, query) {
        Some(MatchKind::Substring)
    } else if is_ordered_subsequence(field, query) {
        Some(MatchKind::Subsequence)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Getting   Started \n"), Some("getting started".to_owned()));
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query(" \t\n "), None);
    }

    #[test]
    fn test_normalize_query_caps_length() {
        let long = "a".repeat(MAX_QUERY_CHARS + 50);

        let query = normalize_query(&long).unwrap();

        assert_eq!(query.chars().count(), MAX_QUERY_CHARS);
    }

    #[test]
    fn test_normalize_is_per_character() {
        assert_eq!(normalize("ΟΔΟΣ"), "οδοσ");
        assert_eq!(normalize_query("Οδός ΟΔΟΣ"), Some("οδός οδοσ".to_owned()));
    }

    #[test]
    fn test_contains_substring() {
        assert!(contains_substring("getting started", "start"));
        assert!(!contains_substring("getting started", "gs"));
    }

    #[test]
    fn test_is_ordered_subsequence() {
        assert!(is_ordered_subsequence("getting docs", "gdoc"));
        assert!(is_ordered_subsequence("getting docs", "getting docs"));
        assert!(is_ordered_subsequence("abc", ""));
        assert!(!is_ordered_subsequence("getting docs", "cdog"));
        assert!(!is_ordered_subsequence("", "a"));
    }

    #[test]
    fn test_is_ordered_subsequence_unicode() {
        assert!(is_ordered_subsequence("über größe", "üg"));
        assert!(!is_ordered_subsequence("über", "ue"));
    }

    #[test]
    fn test_match_field_prefers_substring() {
        assert_eq!(match_field("getting docs", "docs"), Some(MatchKind::Substring));
        assert_eq!(match_field("getting docs", "gdoc"), Some(MatchKind::Subsequence));
        assert_eq!(match_field("getting docs", "xyz"), None);
    }

    #[test]
    fn test_exact_title_always_matches() {
        let title = normalize("Getting Started");

        assert_eq!(
            match_field(&title, &normalize_query("Getting Started").unwrap()),
            Some(MatchKind::Substring)
        );
    }
}
