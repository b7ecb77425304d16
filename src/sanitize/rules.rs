//! Attribute rewrite rules.
//!
//! Every `(tag, attribute)` pair maps to one of a closed set of rules by
//! static lookup:
//!
//! | Rule | Applies to | Behavior |
//! |------|------------|----------|
//! | `PassThrough` | everything not URL-bearing | value kept verbatim |
//! | `SchemeFiltered` | URL attributes, no repository | scheme gate + relative toggle |
//! | `Resolved` | URL attributes, repository known | resolve, then scheme gate |
//!
//! The two URL classes are the link sanitizer (`href`, `cite`) and the
//! image sanitizer (`src`, `poster`).

use std::borrow::Cow;

use crate::core::LinkKind;
use crate::resolve::{RepositoryCoordinate, UrlRejected, resolve};
use crate::utils::url::{canonicalize, scheme_of};

use super::SanitizationPolicy;
use super::report::DropReason;

/// Which sanitizer a URL-bearing attribute goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlClass {
    /// Navigation targets: `a[href]`, `area[href]`, `q[cite]` ...
    Link,
    /// Fetched resources: `img[src]`, `video[poster]` ...
    Media,
}

/// How one attribute value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    PassThrough,
    SchemeFiltered(UrlClass),
    Resolved(UrlClass),
}

/// URL class of an attribute, if it carries a URL.
pub fn url_class(tag: &str, attr: &str) -> Option<UrlClass> {
    match (tag, attr) {
        ("a" | "area", "href") | ("blockquote" | "q" | "del" | "ins", "cite") => {
            Some(UrlClass::Link)
        }
        ("img" | "audio" | "video" | "source" | "track", "src") | ("video", "poster") => {
            Some(UrlClass::Media)
        }
        _ => None,
    }
}

/// Pick the rule for an attribute. Resolver-backed rules are only
/// installed when a repository is known.
pub fn rule_for(tag: &str, attr: &str, has_repository: bool) -> RewriteRule {
    match url_class(tag, attr) {
        None => RewriteRule::PassThrough,
        Some(class) if has_repository => RewriteRule::Resolved(class),
        Some(class) => RewriteRule::SchemeFiltered(class),
    }
}

/// Elements that are meaningless without a surviving `src`.
#[inline]
pub fn requires_source(tag: &str) -> bool {
    tag == "img"
}

/// Apply `rule` to a decoded attribute value.
///
/// Returns the value to emit, or why the attribute must be dropped.
pub fn apply(
    rule: RewriteRule,
    value: &str,
    policy: &SanitizationPolicy,
    coordinate: Option<&RepositoryCoordinate>,
) -> Result<String, DropReason> {
    let class = match rule {
        RewriteRule::PassThrough => return Ok(value.to_string()),
        RewriteRule::SchemeFiltered(class) | RewriteRule::Resolved(class) => class,
    };

    let canonical = canonicalize(value);
    if canonical.is_empty() {
        return Err(DropReason::Unresolvable(UrlRejected::Empty));
    }

    let kind = LinkKind::parse(&canonical);
    if kind.is_relative_path() && !policy.allows_relative(class) {
        return Err(DropReason::RelativeNotAllowed);
    }

    let rewritten: Cow<'_, str> = match (rule, &kind) {
        (RewriteRule::Resolved(_), _) | (_, LinkKind::SchemeRelative(_)) => {
            resolve(&canonical, coordinate).map_err(DropReason::Unresolvable)?
        }
        _ => Cow::Borrowed(&canonical),
    };

    if let Some(scheme) = scheme_of(&rewritten)
        && !policy.allows_scheme(class, &scheme)
    {
        return Err(DropReason::DisallowedScheme(scheme));
    }

    Ok(rewritten.into_owned())
}
