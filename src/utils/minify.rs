//! Whitespace compression for compiled CSS.
//!
//! This is not a CSS minifier: it drops line breaks, tabs and double spaces
//! and leaves everything else as the compiler wrote it.

use std::borrow::Cow;

/// Sequences removed from the output, applied in order.
const STRIPPED: &[&str] = &["\r\n", "\r", "\n", "\t", "  "];

/// Compress CSS if enabled.
///
/// Returns `Cow::Borrowed` if compression is disabled or nothing matched.
pub fn minify_css(css: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled || !STRIPPED.iter().any(|seq| css.contains(seq)) {
        return Cow::Borrowed(css);
    }

    let compressed = STRIPPED
        .iter()
        .fold(css.to_owned(), |acc, seq| acc.replace(seq, ""));
    Cow::Owned(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_disabled() {
        let css = "body {\n  color: red;\n}\n";
        assert!(matches!(minify_css(css, false), Cow::Borrowed(s) if s == css));
    }

    #[test]
    fn test_minify_strips_whitespace() {
        let css = "body {\r\n  color: red;\n\tmargin: 0;\n}\n";
        assert_eq!(minify_css(css, true), "body {color: red;margin: 0;}");
    }

    #[test]
    fn test_minify_keeps_single_spaces() {
        assert_eq!(minify_css("a b  c", true), "a bc");
        assert!(matches!(minify_css("a b", true), Cow::Borrowed("a b")));
    }

    #[test]
    fn test_minify_odd_space_run() {
        // Pairs are removed left to right, so three spaces leave one
        assert_eq!(minify_css("a   b", true), "a b");
    }
}
