//! URL resolution against a source repository.
//!
//! Pure string manipulation: nothing here touches the network.
//!
//! | LinkKind | Example | Result |
//! |----------|---------|--------|
//! | `Absolute` | `https://...` | Preserved as-is |
//! | `Fragment` | `#section` | Preserved as-is |
//! | `SchemeRelative` | `//host/a.png` | Promoted to `https:` |
//! | `RootRelative` | `/docs/x.md` | Raw URL from the repository root |
//! | `DocumentRelative` | `docs/x.md` | Raw URL from the base path |

mod coordinate;
mod path;

use std::borrow::Cow;

use thiserror::Error;
use url::Url;

use crate::core::LinkKind;

pub use coordinate::{CoordinateError, Forge, RepositoryCoordinate};

/// Why a URL could not be resolved.
///
/// Never fatal: the sanitizer drops the attribute (or element) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrlRejected {
    #[error("empty URL")]
    Empty,

    #[error("relative URL with no repository to resolve against")]
    NoRepository,

    #[error("path escapes the repository root")]
    Traversal,

    #[error("not a well-formed URL")]
    Malformed,
}

/// Resolve a canonicalized URL value against an optional repository.
///
/// Absolute URLs and fragments come back borrowed and untouched; scheme
/// filtering is left to the caller.
///
/// # Example
/// ```
/// use readme_renderer::{RepositoryCoordinate, resolve::resolve};
/// let repo = RepositoryCoordinate::new("github.com", "mondeja/leptos-fluent", "")?;
/// assert_eq!(
///     resolve("docs/x.md", Some(&repo)).unwrap(),
///     "https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/docs/x.md"
/// );
/// assert!(resolve("../../../etc/passwd", Some(&repo)).is_err());
/// # Ok::<(), readme_renderer::CoordinateError>(())
/// ```
pub fn resolve<'a>(
    url: &'a str,
    coordinate: Option<&RepositoryCoordinate>,
) -> Result<Cow<'a, str>, UrlRejected> {
    if url.is_empty() {
        return Err(UrlRejected::Empty);
    }

    match LinkKind::parse(url) {
        LinkKind::Absolute { .. } | LinkKind::Fragment(_) => Ok(Cow::Borrowed(url)),

        LinkKind::SchemeRelative(link) => {
            let promoted = format!("https://{}", &link[2..]);
            Url::parse(&promoted).map_err(|_| UrlRejected::Malformed)?;
            Ok(Cow::Owned(promoted))
        }

        LinkKind::RootRelative(link) => coordinate
            .ok_or(UrlRejected::NoRepository)?
            .raw_url(link, true)
            .map(Cow::Owned),

        LinkKind::DocumentRelative(link) => coordinate
            .ok_or(UrlRejected::NoRepository)?
            .raw_url(link, false)
            .map(Cow::Owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryCoordinate {
        RepositoryCoordinate::new("github.com", "mondeja/leptos-fluent", "").unwrap()
    }

    #[test]
    fn test_absolute_untouched() {
        let repo = repo();
        assert_eq!(resolve("https://example.com/a", Some(&repo)).unwrap(), "https://example.com/a");
        assert_eq!(resolve("mailto:a@b.c", None).unwrap(), "mailto:a@b.c");
        // scheme filtering is not the resolver's job
        assert_eq!(resolve("javascript:alert(1)", None).unwrap(), "javascript:alert(1)");
    }

    #[test]
    fn test_fragment_untouched() {
        assert_eq!(resolve("#usage", Some(&repo())).unwrap(), "#usage");
        assert_eq!(resolve("./#usage", None).unwrap(), "./#usage");
    }

    #[test]
    fn test_scheme_relative_promoted() {
        assert_eq!(
            resolve("//img.shields.io/badge.svg", None).unwrap(),
            "https://img.shields.io/badge.svg"
        );
        assert_eq!(resolve("//", None), Err(UrlRejected::Malformed));
    }

    #[test]
    fn test_relative_resolved() {
        let repo = repo();
        assert_eq!(
            resolve("docs/x.md", Some(&repo)).unwrap(),
            "https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/docs/x.md"
        );
        assert_eq!(
            resolve("./assets/logo.png", Some(&repo)).unwrap(),
            "https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/assets/logo.png"
        );
        assert_eq!(
            resolve("/LICENSE", Some(&repo)).unwrap(),
            "https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/LICENSE"
        );
    }

    #[test]
    fn test_relative_with_base_path() {
        let repo = RepositoryCoordinate::new("gitlab.com", "o/r", "docs/").unwrap();
        assert_eq!(
            resolve("../README.md", Some(&repo)).unwrap(),
            "https://gitlab.com/o/r/-/raw/HEAD/README.md"
        );
        assert_eq!(
            resolve("/README.md", Some(&repo)).unwrap(),
            "https://gitlab.com/o/r/-/raw/HEAD/README.md"
        );
        assert_eq!(
            resolve("intro.md", Some(&repo)).unwrap(),
            "https://gitlab.com/o/r/-/raw/HEAD/docs/intro.md"
        );
    }

    #[test]
    fn test_rejections() {
        let repo = repo();
        assert_eq!(resolve("", Some(&repo)), Err(UrlRejected::Empty));
        assert_eq!(resolve("docs/x.md", None), Err(UrlRejected::NoRepository));
        assert_eq!(resolve("/x", None), Err(UrlRejected::NoRepository));
        assert_eq!(resolve("../../../etc/passwd", Some(&repo)), Err(UrlRejected::Traversal));
        assert_eq!(resolve("/../x", Some(&repo)), Err(UrlRejected::Traversal));
        assert_eq!(resolve("%2e%2e/secret", Some(&repo)), Err(UrlRejected::Traversal));
    }
}
