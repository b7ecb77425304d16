//! Rewrites applied to already-sanitized HTML.
//!
//! 1. A leading `<h1>`/`<h2>` is removed: the package page shows the
//!    project name above the README already.
//! 2. Images served from GitHub's raw host are pointed at a caching CDN.
//!
//! Both are literal text rewrites over sanitizer output, whose shape
//! (lowercase tags, double-quoted attributes) is known.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// CDN that mirrors `raw.githubusercontent.com` with proper content types.
pub const RAW_CDN_ROOT: &str = "https://rawcdn.githack.com/";

/// Apply every post-processing pass, in order.
pub fn post_process(html: &str) -> String {
    let stripped = strip_leading_title(html);
    rewrite_cdn_images(&stripped).into_owned()
}

/// Remove the first element when it is an `<h1>` or `<h2>`.
///
/// Only leading whitespace may precede it; a heading anywhere else is kept.
/// The heading runs to its matching close tag, counting nested headings of
/// the same level. An unclosed heading is left alone.
pub fn strip_leading_title(html: &str) -> Cow<'_, str> {
    static RE_LEADING_TITLE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\s*<(h[12])(?:\s[^>]*)?>").unwrap());
    static RE_HEADING_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<(/?)(h[12])(?:\s[^>]*)?>").unwrap());

    let Some(open) = RE_LEADING_TITLE.captures(html) else {
        return Cow::Borrowed(html);
    };
    let level = &open[1];
    let body_start = open.get(0).map_or(0, |m| m.end());

    let mut depth = 1usize;
    for tag in RE_HEADING_TAG.captures_iter(&html[body_start..]) {
        if &tag[2] != level {
            continue;
        }
        if tag[1].is_empty() {
            depth += 1;
            continue;
        }
        depth -= 1;
        if depth == 0 {
            let end = body_start + tag.get(0).map_or(0, |m| m.end());
            return Cow::Owned(html[end..].to_string());
        }
    }
    Cow::Borrowed(html)
}

/// Point `<img src>` values on GitHub's raw hosts at [`RAW_CDN_ROOT`].
pub fn rewrite_cdn_images(html: &str) -> Cow<'_, str> {
    static RE_RAW_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(<img\s(?:[^>]*?\s)?src=")https://raw\.(?:githubusercontent|github)\.com/"#)
            .unwrap()
    });

    RE_RAW_IMAGE.replace_all(html, format!("${{1}}{RAW_CDN_ROOT}"))
}
