//! Default matcher for context filters.
//!
//! A path context is the dot-joined member names from the root down to the
//! designated value. The engine accepts any `fn(&str, &str) -> bool` as a
//! matcher; this module provides the default.

/// Segment-wise pattern match over `.`-separated paths.
///
/// The empty pattern matches every path. Otherwise the pattern must have
/// the same number of segments as the path, each segment matching
/// literally or via `*`, which matches exactly one segment of any name.
pub fn segments_match(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    let mut pat = pattern.split('.');
    let mut seg = path.split('.');
    loop {
        match (pat.next(), seg.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                if p != "*" && p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_matches_everything() {
        assert!(segments_match("", ""));
        assert!(segments_match("", "a"));
        assert!(segments_match("", "a.b.c"));
    }

    #[test]
    fn literal_segments() {
        assert!(segments_match("books.title", "books.title"));
        assert!(!segments_match("books.title", "books.author"));
        assert!(!segments_match("books", "books.title"));
        assert!(!segments_match("books.title", "books"));
    }

    #[test]
    fn star_matches_one_segment() {
        assert!(segments_match("books.*", "books.title"));
        assert!(segments_match("*.title", "books.title"));
        assert!(!segments_match("*", "books.title"));
        assert!(!segments_match("books.*.name", "books.title"));
    }

    #[test]
    fn nonempty_pattern_rejects_empty_path() {
        assert!(!segments_match("a", ""));
    }
}
