//! README rendering pipeline.
//!
//! ```text
//! markdown ──► markdown_to_html ──► sanitize ──► post_process ──► Rendered
//!                                      ▲
//!                 html ────────────────┘
//! ```

use crate::error::RenderError;
use crate::markdown::{MarkdownOptions, markdown_to_html_with};
use crate::postprocess::post_process;
use crate::resolve::RepositoryCoordinate;
use crate::sanitize::{DropReport, SanitizationPolicy, Sanitizer};

/// Final HTML of one render, plus what the sanitizer removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub report: DropReport,
}

/// Policy, repository context and options for rendering READMEs.
///
/// Immutable once built; `render_*` take `&self`, so a renderer can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    policy: SanitizationPolicy,
    coordinate: Option<RepositoryCoordinate>,
    markdown: MarkdownOptions,
    post_process: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(SanitizationPolicy::packagist())
    }
}

impl Renderer {
    pub fn new(policy: SanitizationPolicy) -> Self {
        Self {
            policy,
            coordinate: None,
            markdown: MarkdownOptions::gfm(),
            post_process: true,
        }
    }

    /// Resolve relative links and images against this repository.
    pub fn with_repository(mut self, coordinate: RepositoryCoordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown = options;
        self
    }

    /// Toggle the title strip and CDN rewrite (on by default).
    pub fn with_post_process(mut self, enabled: bool) -> Self {
        self.post_process = enabled;
        self
    }

    pub fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }

    pub fn coordinate(&self) -> Option<&RepositoryCoordinate> {
        self.coordinate.as_ref()
    }

    /// Render a markdown README.
    pub fn render_markdown(&self, markdown: &str) -> Result<Rendered, RenderError> {
        let max = self.policy.max_input_length();
        if markdown.len() > max {
            return Err(RenderError::InputTooLarge {
                len: markdown.len(),
                max,
            });
        }

        let html = markdown_to_html_with(markdown, self.markdown);
        crate::debug!("render"; "markdown converted: {} -> {} bytes", markdown.len(), html.len());
        self.render_html(&html)
    }

    /// Render an HTML README (or already-converted markdown).
    pub fn render_html(&self, html: &str) -> Result<Rendered, RenderError> {
        if let Some(coordinate) = &self.coordinate {
            crate::debug!("render"; "resolving relative URLs against {}", coordinate);
        }

        let sanitized = Sanitizer::new(&self.policy, self.coordinate.as_ref()).sanitize(html)?;
        let html = if self.post_process {
            post_process(&sanitized.html)
        } else {
            sanitized.html
        };

        Ok(Rendered {
            html,
            report: sanitized.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::PACKAGIST_LINK_REL;

    const README: &str = r#"# leptos-fluent

<p align="center">
  <img src="docs/logo.png" alt="logo" onerror="x()">
</p>

Internationalization framework for [Leptos](https://leptos.dev).
See the [book](./book/README.md) or [escape](../../../etc/passwd).

<script>alert("pwned")</script>

## Usage

| a | b |
|---|---|
| 1 | 2 |
"#;

    fn renderer() -> Renderer {
        let repo = RepositoryCoordinate::new("github.com", "mondeja/leptos-fluent", "").unwrap();
        Renderer::default().with_repository(repo)
    }

    #[test]
    fn test_render_markdown_end_to_end() {
        let rendered = renderer().render_markdown(README).unwrap();
        let html = &rendered.html;

        // leading title stripped, later heading kept
        assert!(!html.contains("<h1>"));
        assert!(html.contains("<h2>Usage</h2>"));

        // relative image resolved, then moved to the CDN
        assert!(html.contains(
            r#"<img src="https://rawcdn.githack.com/mondeja/leptos-fluent/HEAD/docs/logo.png" alt="logo" />"#
        ));
        assert!(html.contains(&format!(
            r#"<a href="https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/book/README.md" rel="{PACKAGIST_LINK_REL}">book</a>"#
        )));
        assert!(html.contains(&format!(r#"<a rel="{PACKAGIST_LINK_REL}">escape</a>"#)));
        assert!(html.contains(r#"<p align="center">"#));
        assert!(html.contains("<table>"));

        assert!(!html.contains("script"));
        assert!(!html.contains("onerror"));
        assert!(rendered.report.has_dropped_element("script"));
        assert!(rendered.report.has_dropped_attribute("a", "href"));
    }

    #[test]
    fn test_render_without_post_process() {
        let rendered = renderer()
            .with_post_process(false)
            .render_markdown("# Title\n\n![x](a.png)\n")
            .unwrap();
        assert!(rendered.html.contains("<h1>Title</h1>"));
        assert!(rendered.html.contains(
            r#"src="https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/a.png""#
        ));
    }

    #[test]
    fn test_render_html_without_repository() {
        let rendered = Renderer::default()
            .render_html(r#"<p><a href="docs/x.md">x</a></p>"#)
            .unwrap();
        assert_eq!(
            rendered.html,
            format!(r#"<p><a href="docs/x.md" rel="{PACKAGIST_LINK_REL}">x</a></p>"#)
        );
    }

    #[test]
    fn test_oversized_markdown_rejected() {
        let policy = SanitizationPolicy::builder()
            .allow_element("p", &[])
            .max_input_length(8)
            .build();
        let err = Renderer::new(policy).render_markdown("123456789").unwrap_err();
        assert_eq!(err, RenderError::InputTooLarge { len: 9, max: 8 });
    }

    #[test]
    fn test_renderer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Renderer>();
    }
}
