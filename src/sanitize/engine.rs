//! The allowlist walk.
//!
//! Depth-first and order-preserving:
//! 1. elements in the remove-with-content set are dropped with their subtree
//! 2. other disallowed elements are unwrapped (children kept at the parent level)
//! 3. attributes are filtered, URL attributes go through their [`RewriteRule`]
//! 4. forced attributes overwrite in place, or are appended when absent
//!
//! [`RewriteRule`]: super::rules::RewriteRule

use rustc_hash::FxHashSet;

use crate::error::RenderError;
use crate::resolve::RepositoryCoordinate;

use super::SanitizationPolicy;
use super::dom::{self, Element, Node};
use super::report::{DropReason, DropReport, SanitizationResult};
use super::rules;

/// A policy plus the optional repository URLs are resolved against.
///
/// Cheap to build; holds only references, so one policy can back any number
/// of sanitizers.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'a> {
    policy: &'a SanitizationPolicy,
    coordinate: Option<&'a RepositoryCoordinate>,
}

impl<'a> Sanitizer<'a> {
    pub fn new(policy: &'a SanitizationPolicy, coordinate: Option<&'a RepositoryCoordinate>) -> Self {
        Self { policy, coordinate }
    }

    /// Sanitize one HTML fragment.
    ///
    /// Fails only when the input is over the policy's size limit or cannot
    /// be parsed at all; everything else is dropped and reported.
    pub fn sanitize(&self, html: &str) -> Result<SanitizationResult, RenderError> {
        let max = self.policy.max_input_length();
        if html.len() > max {
            return Err(RenderError::InputTooLarge {
                len: html.len(),
                max,
            });
        }

        let nodes = dom::parse(html)?;
        let mut report = DropReport::default();
        let mut kept = Vec::with_capacity(nodes.len());
        self.sanitize_nodes(nodes, &mut kept, &mut report);

        if !report.is_empty() {
            crate::debug!("sanitize"; "dropped {} element(s), {} attribute(s)",
                report.elements().len(), report.attributes().len());
        }

        Ok(SanitizationResult {
            html: dom::serialize(&kept),
            report,
        })
    }

    fn sanitize_nodes(&self, nodes: Vec<Node>, out: &mut Vec<Node>, report: &mut DropReport) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push(Node::Text(text)),
                Node::Element(element) => self.sanitize_element(element, out, report),
            }
        }
    }

    fn sanitize_element(&self, element: Element, out: &mut Vec<Node>, report: &mut DropReport) {
        let Element {
            tag,
            attrs,
            children,
        } = element;

        if self.policy.removes_with_content(&tag) {
            report.drop_element(&tag, DropReason::RemovedWithContent);
            return;
        }
        if !self.policy.allows_element(&tag) {
            report.drop_element(&tag, DropReason::DisallowedElement);
            self.sanitize_nodes(children, out, report);
            return;
        }

        let attrs = self.sanitize_attributes(&tag, attrs, report);
        if rules::requires_source(&tag) && !attrs.iter().any(|(name, _)| name == "src") {
            report.drop_element(&tag, DropReason::MissingSource);
            return;
        }

        let mut kept = Vec::with_capacity(children.len());
        self.sanitize_nodes(children, &mut kept, report);
        out.push(Node::Element(Element {
            tag,
            attrs,
            children: kept,
        }));
    }

    fn sanitize_attributes(
        &self,
        tag: &str,
        attrs: Vec<(String, String)>,
        report: &mut DropReport,
    ) -> Vec<(String, String)> {
        let forced = self.policy.forced_attributes(tag);
        let mut seen = FxHashSet::default();
        let mut kept = Vec::with_capacity(attrs.len() + forced.len());

        for (name, value) in attrs {
            if !seen.insert(name.clone()) {
                report.drop_attribute(tag, &name, DropReason::DuplicateAttribute);
                continue;
            }

            if let Some((_, fixed)) = forced.iter().find(|(attr, _)| *attr == name) {
                kept.push((name, fixed.clone()));
                continue;
            }

            if !self.policy.allows_attribute(tag, &name) {
                report.drop_attribute(tag, &name, DropReason::DisallowedAttribute);
                continue;
            }

            let rule = rules::rule_for(tag, &name, self.coordinate.is_some());
            match rules::apply(rule, &value, self.policy, self.coordinate) {
                Ok(value) => kept.push((name, value)),
                Err(reason) => report.drop_attribute(tag, &name, reason),
            }
        }

        kept.extend(
            forced
                .iter()
                .filter(|(name, _)| !seen.contains(name))
                .cloned(),
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::UrlRejected;
    use crate::sanitize::PACKAGIST_LINK_REL;

    fn repo() -> RepositoryCoordinate {
        RepositoryCoordinate::new("github.com", "mondeja/leptos-fluent", "").unwrap()
    }

    fn clean(html: &str) -> SanitizationResult {
        let policy = SanitizationPolicy::packagist();
        let repo = repo();
        Sanitizer::new(&policy, Some(&repo)).sanitize(html).unwrap()
    }

    fn clean_html(html: &str) -> String {
        clean(html).html
    }

    fn clean_html_result(html: &str) -> Result<String, RenderError> {
        let policy = SanitizationPolicy::packagist();
        Sanitizer::new(&policy, None).sanitize(html).map(|r| r.html)
    }

    #[test]
    fn test_allowed_markup_kept() {
        assert_eq!(
            clean_html("<p>Hello <strong>world</strong></p>"),
            "<p>Hello <strong>world</strong></p>"
        );
        assert_eq!(clean_html("<p></p>"), "<p></p>");
        assert_eq!(
            clean_html(r#"<P ALIGN="center" class="lead">x</P>"#),
            r#"<p align="center" class="lead">x</p>"#
        );
    }

    #[test]
    fn test_disallowed_element_unwrapped() {
        let result = clean("<div><section><em>x</em></section></div>");
        assert_eq!(result.html, "<em>x</em>");
        assert!(result.report.has_dropped_element("div"));
        assert!(result.report.has_dropped_element("section"));
    }

    #[test]
    fn test_script_removed_with_content() {
        let result = clean("<p>Hi <script>alert(1)</script>there</p>");
        assert_eq!(result.html, "<p>Hi there</p>");
        assert_eq!(
            result.report.elements()[0].reason,
            DropReason::RemovedWithContent
        );
    }

    #[test]
    fn test_disallowed_attributes_dropped() {
        let result = clean(r#"<p class="x" onclick="steal()" style="color:red">a</p>"#);
        assert_eq!(result.html, r#"<p class="x">a</p>"#);
        assert!(result.report.has_dropped_attribute("p", "onclick"));
        assert!(result.report.has_dropped_attribute("p", "style"));
    }

    #[test]
    fn test_forced_rel_appended() {
        assert_eq!(
            clean_html(r#"<a href="https://example.com/" target="_blank">x</a>"#),
            format!(r#"<a href="https://example.com/" target="_blank" rel="{PACKAGIST_LINK_REL}">x</a>"#)
        );
        assert_eq!(
            clean_html("<a>x</a>"),
            format!(r#"<a rel="{PACKAGIST_LINK_REL}">x</a>"#)
        );
    }

    #[test]
    fn test_forced_rel_overwrites_in_place() {
        let result = clean(r#"<a rel="me" href="https://example.com/">x</a>"#);
        assert_eq!(
            result.html,
            format!(r#"<a rel="{PACKAGIST_LINK_REL}" href="https://example.com/">x</a>"#)
        );
        assert!(result.report.is_empty());
    }

    #[test]
    fn test_duplicate_attribute_first_wins() {
        assert_eq!(
            clean_html(r#"<a href="https://a.example/" href="https://b.example/">x</a>"#),
            format!(r#"<a href="https://a.example/" rel="{PACKAGIST_LINK_REL}">x</a>"#)
        );

        let policy = SanitizationPolicy::packagist();
        let mut report = DropReport::default();
        let attrs = Sanitizer::new(&policy, None).sanitize_attributes(
            "a",
            vec![
                ("href".into(), "https://a.example/".into()),
                ("href".into(), "https://b.example/".into()),
            ],
            &mut report,
        );
        assert_eq!(
            attrs,
            vec![
                ("href".to_string(), "https://a.example/".to_string()),
                ("rel".to_string(), PACKAGIST_LINK_REL.to_string()),
            ]
        );
        assert_eq!(
            report.attributes()[0].reason,
            DropReason::DuplicateAttribute
        );
    }

    #[test]
    fn test_javascript_href_dropped() {
        let result = clean(r#"<a href="javascript:alert(1)">x</a>"#);
        assert_eq!(result.html, format!(r#"<a rel="{PACKAGIST_LINK_REL}">x</a>"#));
        assert_eq!(
            result.report.attributes()[0].reason,
            DropReason::DisallowedScheme("javascript".into())
        );
    }

    #[test]
    fn test_control_characters_do_not_bypass_scheme_filter() {
        for href in ["java&#9;script:alert(1)", "java&#10;script:alert(1)", " JAVASCRIPT:alert(1)"] {
            let html = clean_html(&format!(r#"<a href="{href}">x</a>"#));
            assert!(!html.contains("href"), "{href} survived: {html}");
        }
    }

    #[test]
    fn test_relative_link_resolved() {
        assert_eq!(
            clean_html(r#"<a href="docs/x.md">docs</a>"#),
            format!(
                r#"<a href="https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/docs/x.md" rel="{PACKAGIST_LINK_REL}">docs</a>"#
            )
        );
        assert_eq!(
            clean_html(r##"<a href="#install">i</a>"##),
            format!(r##"<a href="#install" rel="{PACKAGIST_LINK_REL}">i</a>"##)
        );
    }

    #[test]
    fn test_traversal_href_dropped() {
        let result = clean(r#"<a href="../../../etc/passwd">p</a>"#);
        assert_eq!(result.html, format!(r#"<a rel="{PACKAGIST_LINK_REL}">p</a>"#));
        assert_eq!(
            result.report.attributes()[0].reason,
            DropReason::Unresolvable(UrlRejected::Traversal)
        );

        let result = clean(r#"<a href="%2e%2e/%2e%2e/x">p</a>"#);
        assert!(result.report.has_dropped_attribute("a", "href"));
    }

    #[test]
    fn test_image_resolved() {
        assert_eq!(
            clean_html(r#"<img src="./logo.png" alt="logo" width="100">"#),
            r#"<img src="https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/logo.png" alt="logo" width="100" />"#
        );
        assert_eq!(
            clean_html(r#"<img src="data:image/png;base64,AAAA">"#),
            r#"<img src="data:image/png;base64,AAAA" />"#
        );
    }

    #[test]
    fn test_image_without_usable_src_dropped() {
        let result = clean(r#"<p><img src="javascript:alert(1)" alt="a">t</p>"#);
        assert_eq!(result.html, "<p>t</p>");
        assert!(result.report.has_dropped_element("img"));
        assert!(result.report.has_dropped_attribute("img", "src"));

        let result = clean(r#"<p><img src="../../x.png">t</p>"#);
        assert_eq!(result.html, "<p>t</p>");

        let result = clean(r#"<p><img alt="no source">t</p>"#);
        assert_eq!(result.html, "<p>t</p>");
        assert_eq!(
            result.report.elements()[0].reason,
            DropReason::MissingSource
        );
    }

    #[test]
    fn test_without_repository() {
        let policy = SanitizationPolicy::packagist();
        let sanitizer = Sanitizer::new(&policy, None);

        let html = sanitizer
            .sanitize(r#"<a href="docs/x.md">d</a><img src="//cdn.example.com/a.png">"#)
            .unwrap()
            .html;
        assert_eq!(
            html,
            format!(
                r#"<a href="docs/x.md" rel="{PACKAGIST_LINK_REL}">d</a><img src="https://cdn.example.com/a.png" />"#
            )
        );
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(
            clean_html("<p>a > b & c &copy; &amp;</p>"),
            "<p>a &gt; b &amp; c © &amp;</p>"
        );
        assert_eq!(clean_html("<p>a < b</p>"), "<p>a &lt; b</p>");
        assert_eq!(
            clean_html(r#"<a title="x" href="https://e.example/?a=1&amp;b=2">y</a>"#),
            format!(r#"<a href="https://e.example/?a=1&amp;b=2" rel="{PACKAGIST_LINK_REL}">y</a>"#)
        );
    }

    #[test]
    fn test_named_references_in_attributes_decoded() {
        let result = clean(r#"<img src="a.png" alt="&copy; 2024 caf&eacute; &mdash;">"#);
        assert_eq!(
            result.html,
            r#"<img src="https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/a.png" alt="© 2024 café —" />"#
        );
        assert!(!result.html.contains("&amp;"));
        assert_eq!(clean_html(&result.html), result.html);
    }

    #[test]
    fn test_unquoted_url_attributes() {
        assert_eq!(
            clean_html("<img src=https://img.shields.io/badge.svg alt=badge>"),
            r#"<img src="https://img.shields.io/badge.svg" alt="badge" />"#
        );
        assert_eq!(
            clean_html("<a href=https://example.com/>x</a>"),
            format!(r#"<a href="https://example.com/" rel="{PACKAGIST_LINK_REL}">x</a>"#)
        );
    }

    #[test]
    fn test_deep_nesting_is_a_resource_error() {
        let html = "<span>".repeat(dom::MAX_DEPTH + 10);
        assert_eq!(
            clean_html_result(&html),
            Err(RenderError::NestingTooDeep { max: dom::MAX_DEPTH })
        );
    }

    #[test]
    fn test_input_too_large() {
        let policy = SanitizationPolicy::builder()
            .allow_element("p", &[])
            .max_input_length(10)
            .build();
        let err = Sanitizer::new(&policy, None)
            .sanitize("<p>123456</p>")
            .unwrap_err();
        assert_eq!(err, RenderError::InputTooLarge { len: 13, max: 10 });

        assert!(Sanitizer::new(&policy, None).sanitize("<p>12</p>").is_ok());
    }

    const MESSY: &str = r#"<h1 align="center">Title</h1>
<div class="box"><p onclick="x()">Intro &amp; more, 5 > 3 &copy;</p></div>
<style>p { color: red }</style>
<table><thead><tr><th align="left" colspan="2">h</th></tr></thead>
<tbody><tr><td rowspan="1">c</td><td>d</td></tr></tbody></table>
<a href="javascript:alert(1)" rel="x" id="top">js</a>
<a href="/LICENSE" title="t">license</a>
<a href="https://example.com/?a=1&amp;b='2'">q</a>
<img src="docs/shot.png" alt="a &quot;b&quot;" onerror="x()">
<img src="vbscript:x">
<iframe src="https://evil.example/"><p>inner</p></iframe>
<details open><summary>More</summary><pre><code class="language-rust">fn main() {}</code></pre></details>
<ul><li><input type="checkbox" checked> task</li></ul>"#;

    #[test]
    fn test_idempotent() {
        let once = clean_html(MESSY);
        let twice = clean_html(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_disallowed_tags_or_schemes_survive() {
        let html = clean_html(MESSY);
        for needle in [
            "<div", "<style", "<iframe", "<input", "onclick", "onerror", "javascript:",
            "vbscript:", "color: red", "inner",
        ] {
            assert!(!html.contains(needle), "{needle} found in {html}");
        }
        assert_eq!(
            html.matches("<a ").count(),
            html.matches(&format!(r#"rel="{PACKAGIST_LINK_REL}""#)).count()
        );
        assert!(html.contains(
            r#"<a href="https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/LICENSE""#
        ));
        assert!(html.contains(r#"<details open="">"#));
        assert!(html.contains(r#"<code class="language-rust">"#));
    }
}
