//! HTML sanitization against an allowlist policy.
//!
//! ```text
//! html ──► dom::parse ──► Sanitizer (policy + rules) ──► dom::serialize
//!                              │
//!                              └──► DropReport
//! ```

mod dom;
mod engine;
mod policy;
mod report;
mod rules;

pub use engine::Sanitizer;
pub use policy::{
    PACKAGIST_LINK_REL, PACKAGIST_MAX_INPUT_LENGTH, PolicyBuilder, SanitizationPolicy,
};
pub use report::{DropReason, DropReport, DroppedAttribute, DroppedElement, SanitizationResult};
pub use rules::{RewriteRule, UrlClass, rule_for, url_class};

use crate::error::RenderError;
use crate::resolve::RepositoryCoordinate;

/// Sanitize `html` with `policy`, resolving relative URLs against
/// `coordinate` when one is given.
///
/// # Example
/// ```
/// use readme_renderer::{SanitizationPolicy, sanitize::sanitize};
/// let policy = SanitizationPolicy::packagist();
/// let result = sanitize("<div><p onclick=\"x()\">hi</p></div>", &policy, None)?;
/// assert_eq!(result.html, "<p>hi</p>");
/// # Ok::<(), readme_renderer::RenderError>(())
/// ```
pub fn sanitize(
    html: &str,
    policy: &SanitizationPolicy,
    coordinate: Option<&RepositoryCoordinate>,
) -> Result<SanitizationResult, RenderError> {
    Sanitizer::new(policy, coordinate).sanitize(html)
}
