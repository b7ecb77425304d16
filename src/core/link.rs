//! Link classification utilities.

use crate::utils::url::scheme_of;

/// Syntactic classification of a (canonicalized) URL attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Absolute URL with a scheme (https://, mailto:, javascript:, etc.).
    /// Carries the lowercased scheme.
    Absolute { scheme: String, url: &'a str },
    /// Scheme-relative URL (`//host/path`).
    SchemeRelative(&'a str),
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Repository-root-relative path (/docs/x.md).
    RootRelative(&'a str),
    /// Document-relative path (docs/x.md, ./img.png, ../other).
    DocumentRelative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    pub fn parse(link: &'a str) -> Self {
        if let Some(scheme) = scheme_of(link) {
            Self::Absolute { scheme, url: link }
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if let Some(anchor) = link.strip_prefix("./#") {
            // ./#fragment is semantically equivalent to #fragment (current page anchor)
            Self::Fragment(anchor)
        } else if is_scheme_relative(link) {
            Self::SchemeRelative(link)
        } else if link.starts_with(['/', '\\']) {
            Self::RootRelative(link)
        } else {
            Self::DocumentRelative(link)
        }
    }

    /// Whether resolving this link needs a repository coordinate.
    #[inline]
    pub fn is_relative_path(&self) -> bool {
        matches!(self, Self::RootRelative(_) | Self::DocumentRelative(_))
    }
}

/// Browsers treat `\` like `/` here, so `\\host` and `/\host` are
/// scheme-relative too.
fn is_scheme_relative(link: &str) -> bool {
    let bytes = link.as_bytes();
    bytes.len() >= 2 && matches!(bytes[0], b'/' | b'\\') && matches!(bytes[1], b'/' | b'\\')
}
