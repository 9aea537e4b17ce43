//! `@import` extraction from LESS source text.
//!
//! This is pattern matching, not parsing: a statement is recognised as
//! `@import`, whitespace, a single- or double-quoted target, optional
//! whitespace and a terminating `;`. Comments are stripped first so that a
//! commented-out import is not reported.

use regex::Regex;
use std::{borrow::Cow, path::Path, sync::LazyLock};

/// Extension appended to targets written without one.
pub const DEFAULT_EXTENSION: &str = ".less";

/// Extensions accepted as-is on an import target.
const KNOWN_EXTENSIONS: &[&str] = &[".less", ".lss", ".css"];

/// Targets with this extension are recorded but never scanned.
const LEAF_EXTENSION: &str = "css";

// The regex crate has no backreferences, so each quote style gets its own
// alternative and must close with the same quote.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*@import\s+(?:'([^'\n]*)'|"([^"\n]*)")\s*;"#).expect("valid import regex")
});

// Strings and `url(...)` bodies are matched alongside comments so that a
// `//` or `/*` inside them is never taken for a comment opener.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|[uU][rR][lL]\([^)]*\)|(?P<comment>(?s:/\*.*?\*/)|//[^\n]*)"#,
    )
    .expect("valid comment regex")
});

/// Remove `/* ... */` and `// ...` comments.
///
/// Quoted strings and `url(...)` arguments are kept intact, so
/// `url(http://host/x.png)` and `content: "/*"` survive.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    let has_comment = COMMENT_RE
        .captures_iter(text)
        .any(|caps| caps.name("comment").is_some());
    if !has_comment {
        return Cow::Borrowed(text);
    }

    COMMENT_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        if caps.name("comment").is_some() {
            String::new()
        } else {
            caps[0].to_owned()
        }
    })
}

/// Yield the raw import targets of `text` in order of appearance.
///
/// Lazy and restartable: scanning the same text again yields the same
/// sequence.
pub fn extract_imports(text: &str) -> impl Iterator<Item = &str> {
    IMPORT_RE.captures_iter(text).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|target| target.as_str())
    })
}

/// Append `.less` to a target that has no recognised stylesheet extension.
///
/// `mixins` becomes `mixins.less`; `reset.css` and `theme.lss` are kept.
pub fn infer_extension(target: &str) -> Cow<'_, str> {
    if KNOWN_EXTENSIONS.iter().any(|ext| target.ends_with(ext)) {
        Cow::Borrowed(target)
    } else {
        Cow::Owned(format!("{target}{DEFAULT_EXTENSION}"))
    }
}

/// Whether a resolved dependency is plain CSS, whose contents are not scanned.
pub fn is_leaf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LEAF_EXTENSION)
}
