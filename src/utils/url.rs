//! URL processing utilities.
//!
//! Provides consistent URL handling across the codebase:
//! - Canonicalization of attribute values the way browsers read them
//! - Scheme detection
//! - Path / suffix splitting

use std::borrow::Cow;

/// Remove what a browser ignores when parsing a URL.
///
/// Leading and trailing C0 controls and spaces are trimmed, and ASCII tab,
/// LF and CR are removed wherever they occur, so `java\tscript:` is seen as
/// the `javascript:` it will become.
///
/// # Examples
/// ```
/// use readme_renderer::utils::url::canonicalize;
/// assert_eq!(canonicalize("  https://x/\n"), "https://x/");
/// assert_eq!(canonicalize("java\tscript:alert(1)"), "javascript:alert(1)");
/// ```
pub fn canonicalize(value: &str) -> Cow<'_, str> {
    let trimmed = value.trim_matches(|c: char| c <= ' ');
    if trimmed.contains(['\t', '\n', '\r']) {
        Cow::Owned(trimmed.chars().filter(|c| !matches!(c, '\t' | '\n' | '\r')).collect())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Extract the URL scheme (lowercased) if the link has one.
///
/// A valid scheme must:
/// - Start with an ASCII letter
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
/// - Appear before any `/`, `?` or `#`
///
/// # Examples
/// ```
/// use readme_renderer::utils::url::scheme_of;
/// assert_eq!(scheme_of("HTTPS://example.com").as_deref(), Some("https"));
/// assert_eq!(scheme_of("mailto:user@example.com").as_deref(), Some("mailto"));
/// assert_eq!(scheme_of("/about"), None);
/// assert_eq!(scheme_of("./file.txt"), None);
/// ```
pub fn scheme_of(link: &str) -> Option<String> {
    let pos = link.find(':')?;
    let candidate = &link[..pos];
    let mut chars = candidate.chars();

    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then(|| candidate.to_ascii_lowercase())
}

/// Split a URL into its path and the suffix starting at `?` or `#`.
///
/// # Examples
/// ```
/// use readme_renderer::utils::url::split_path_suffix;
/// assert_eq!(split_path_suffix("a/b.md?plain=1#L3"), ("a/b.md", "?plain=1#L3"));
/// assert_eq!(split_path_suffix("a/b.md"), ("a/b.md", ""));
/// ```
#[inline]
pub fn split_path_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}
