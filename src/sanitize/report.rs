//! What the sanitizer removed, and why.

use std::fmt;

use crate::resolve::UrlRejected;

/// Reason an element or attribute did not make it to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Element not in the allowlist; its children were kept.
    DisallowedElement,
    /// Element removed together with its content.
    RemovedWithContent,
    /// Attribute not allowed on this element.
    DisallowedAttribute,
    /// Attribute repeated on the same element; the first one was kept.
    DuplicateAttribute,
    /// URL scheme (lowercased) not allowed for this attribute.
    DisallowedScheme(String),
    /// Relative URL where the policy accepts only absolute ones.
    RelativeNotAllowed,
    /// The resolver refused the URL.
    Unresolvable(UrlRejected),
    /// Element needs a `src` and none survived.
    MissingSource,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisallowedElement => f.write_str("element not allowed"),
            Self::RemovedWithContent => f.write_str("removed with its content"),
            Self::DisallowedAttribute => f.write_str("attribute not allowed"),
            Self::DuplicateAttribute => f.write_str("duplicate attribute"),
            Self::DisallowedScheme(scheme) => write!(f, "scheme `{scheme}` not allowed"),
            Self::RelativeNotAllowed => f.write_str("relative URL not allowed"),
            Self::Unresolvable(rejected) => write!(f, "unresolvable URL: {rejected}"),
            Self::MissingSource => f.write_str("no usable src"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedElement {
    pub tag: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedAttribute {
    pub tag: String,
    pub attribute: String,
    pub reason: DropReason,
}

/// Everything removed during one sanitize call, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropReport {
    elements: Vec<DroppedElement>,
    attributes: Vec<DroppedAttribute>,
}

impl DropReport {
    pub(crate) fn drop_element(&mut self, tag: &str, reason: DropReason) {
        crate::debug!("sanitize"; "dropped <{}>: {}", tag, reason);
        self.elements.push(DroppedElement {
            tag: tag.to_string(),
            reason,
        });
    }

    pub(crate) fn drop_attribute(&mut self, tag: &str, attribute: &str, reason: DropReason) {
        crate::debug!("sanitize"; "dropped <{} {}>: {}", tag, attribute, reason);
        self.attributes.push(DroppedAttribute {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            reason,
        });
    }

    pub fn elements(&self) -> &[DroppedElement] {
        &self.elements
    }

    pub fn attributes(&self) -> &[DroppedAttribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.elements.len() + self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.attributes.is_empty()
    }

    /// Whether an element with this tag was dropped.
    pub fn has_dropped_element(&self, tag: &str) -> bool {
        self.elements.iter().any(|e| e.tag == tag)
    }

    /// Whether `attribute` was dropped from an element with this tag.
    pub fn has_dropped_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.tag == tag && a.attribute == attribute)
    }
}

impl fmt::Display for DropReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.elements {
            writeln!(f, "<{}>: {}", e.tag, e.reason)?;
        }
        for a in &self.attributes {
            writeln!(f, "<{} {}>: {}", a.tag, a.attribute, a.reason)?;
        }
        Ok(())
    }
}

/// Sanitized HTML plus the report of what was removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizationResult {
    pub html: String,
    pub report: DropReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_queries() {
        let mut report = DropReport::default();
        assert!(report.is_empty());

        report.drop_element("script", DropReason::RemovedWithContent);
        report.drop_attribute("a", "href", DropReason::DisallowedScheme("javascript".into()));

        assert_eq!(report.len(), 2);
        assert!(report.has_dropped_element("script"));
        assert!(!report.has_dropped_element("a"));
        assert!(report.has_dropped_attribute("a", "href"));
        assert!(!report.has_dropped_attribute("img", "href"));
        assert_eq!(report.attributes()[0].reason, DropReason::DisallowedScheme("javascript".into()));
    }

    #[test]
    fn test_report_display() {
        let mut report = DropReport::default();
        report.drop_attribute("a", "href", DropReason::Unresolvable(UrlRejected::Traversal));
        assert_eq!(
            report.to_string(),
            "<a href>: unresolvable URL: path escapes the repository root\n"
        );
    }
}
