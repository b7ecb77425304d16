//! Repository path joining.
//!
//! Paths are percent-decoded and `\` is read as `/` before `.` and `..`
//! segments are collapsed, so encoded traversal (`%2e%2e/`, `..%2f`) is
//! caught the same way as a plain `../`. The joined path is re-encoded per
//! segment on the way out.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use super::UrlRejected;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Split a repository-relative path into decoded segments, collapsing
/// `.` and `..` on top of `base`.
///
/// Returns the segments and whether the path names a directory (ends in
/// `/`, `.` or `..`). Fails with [`UrlRejected::Traversal`] when `..` would
/// climb above the repository root.
pub fn normalize(base: &[String], path: &str) -> Result<(Vec<String>, bool), UrlRejected> {
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| UrlRejected::Malformed)?;
    if decoded.contains('\0') {
        return Err(UrlRejected::Malformed);
    }
    let decoded = decoded.replace('\\', "/");

    let mut segments = base.to_vec();
    let mut is_dir = false;

    for segment in decoded.split('/') {
        match segment {
            "" | "." => is_dir = true,
            ".." => {
                if segments.pop().is_none() {
                    return Err(UrlRejected::Traversal);
                }
                is_dir = true;
            }
            name => {
                segments.push(name.to_string());
                is_dir = false;
            }
        }
    }

    // the root itself is the empty path, never "/"
    let is_dir = is_dir && !segments.is_empty();
    Ok((segments, is_dir))
}

/// Join `path` onto `base` and percent-encode the result.
///
/// # Example
/// ```ignore
/// let base = vec!["docs".to_string()];
/// assert_eq!(join_within_root(&base, "../img/a b.png")?, "img/a%20b.png");
/// ```
pub fn join_within_root(base: &[String], path: &str) -> Result<String, UrlRejected> {
    let (segments, is_dir) = normalize(base, path)?;

    let mut joined = segments
        .iter()
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    if is_dir {
        joined.push('/');
    }
    Ok(joined)
}
