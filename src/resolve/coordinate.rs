//! Repository coordinates and raw-content URL conventions.

use std::fmt;

use thiserror::Error;
use url::Url;

use super::{UrlRejected, path};

/// Invalid repository coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("repository host is empty")]
    EmptyHost,

    #[error("invalid repository host `{0}`")]
    InvalidHost(String),

    #[error("invalid repository `{0}`, expected `owner/repo`")]
    InvalidOwnerRepo(String),

    #[error("base path `{0}` escapes the repository root")]
    BasePathEscapes(String),
}

// ============================================================================
// Forge
// ============================================================================

/// Known code hosts, each with its own raw-content URL layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forge {
    /// `https://raw.githubusercontent.com/{owner}/{repo}/HEAD/{path}`
    GitHub,
    /// `https://gitlab.com/{owner}/{repo}/-/raw/HEAD/{path}`
    GitLab,
    /// `https://bitbucket.org/{owner}/{repo}/raw/HEAD/{path}`
    Bitbucket,
    /// `https://{host}/{owner}/{repo}/raw/HEAD/{path}` (Gitea, Forgejo)
    Other(String),
}

impl Forge {
    /// Pick the convention for a (lowercased) host name.
    pub fn from_host(host: &str) -> Self {
        match host.strip_prefix("www.").unwrap_or(host) {
            "github.com" => Self::GitHub,
            "gitlab.com" => Self::GitLab,
            "bitbucket.org" => Self::Bitbucket,
            _ => Self::Other(host.to_string()),
        }
    }

    /// URL prefix under which repository files are served verbatim.
    /// Always ends with `/`.
    pub fn raw_root(&self, owner_repo: &str) -> String {
        match self {
            Self::GitHub => format!("https://raw.githubusercontent.com/{owner_repo}/HEAD/"),
            Self::GitLab => format!("https://gitlab.com/{owner_repo}/-/raw/HEAD/"),
            Self::Bitbucket => format!("https://bitbucket.org/{owner_repo}/raw/HEAD/"),
            Self::Other(host) => format!("https://{host}/{owner_repo}/raw/HEAD/"),
        }
    }
}

// ============================================================================
// RepositoryCoordinate
// ============================================================================

/// The (host, owner/repo, base path) triple relative URLs are resolved
/// against.
///
/// Invariants:
/// - `host` is lowercase and a valid URL host
/// - `owner_repo` has at least two non-dot segments
/// - `base_path` is empty or a slash-terminated directory inside the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCoordinate {
    host: String,
    owner_repo: String,
    base_segments: Vec<String>,
    forge: Forge,
    raw_root: String,
}

impl RepositoryCoordinate {
    /// Build a coordinate from caller-supplied values.
    ///
    /// # Example
    /// ```
    /// use readme_renderer::RepositoryCoordinate;
    /// let repo = RepositoryCoordinate::new("github.com", "mondeja/leptos-fluent", "")?;
    /// assert_eq!(repo.owner_repo(), "mondeja/leptos-fluent");
    /// # Ok::<(), readme_renderer::CoordinateError>(())
    /// ```
    pub fn new(host: &str, owner_repo: &str, base_path: &str) -> Result<Self, CoordinateError> {
        let host = normalize_host(host)?;
        let owner_repo = normalize_owner_repo(owner_repo)?;
        let (base_segments, _) = path::normalize(&[], base_path)
            .map_err(|_| CoordinateError::BasePathEscapes(base_path.to_string()))?;

        let forge = Forge::from_host(&host);
        let raw_root = forge.raw_root(&owner_repo);

        Ok(Self {
            host,
            owner_repo,
            base_segments,
            forge,
            raw_root,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn owner_repo(&self) -> &str {
        &self.owner_repo
    }

    pub fn forge(&self) -> &Forge {
        &self.forge
    }

    /// Directory of the rendered document inside the repository
    /// (`""` or `"docs/"`).
    pub fn base_path(&self) -> String {
        let mut base = self.base_segments.join("/");
        if !base.is_empty() {
            base.push('/');
        }
        base
    }

    /// Resolve a repository path to its raw-content URL.
    ///
    /// `from_root` selects the repository root as the starting directory
    /// (for `/path`), otherwise the base path is used (for `path`, `./path`).
    /// Query string and fragment are kept verbatim.
    pub fn raw_url(&self, link: &str, from_root: bool) -> Result<String, UrlRejected> {
        let (path, suffix) = crate::utils::url::split_path_suffix(link);
        let base: &[String] = if from_root { &[] } else { &self.base_segments };

        let joined = path::join_within_root(base, path)?;
        let url = format!("{}{joined}{suffix}", self.raw_root);

        Url::parse(&url).map_err(|_| UrlRejected::Malformed)?;
        Ok(url)
    }
}

impl fmt::Display for RepositoryCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.owner_repo)?;
        if !self.base_segments.is_empty() {
            write!(f, " ({})", self.base_path())?;
        }
        Ok(())
    }
}

fn normalize_host(host: &str) -> Result<String, CoordinateError> {
    let host = host.trim().trim_end_matches('/').to_ascii_lowercase();
    if host.is_empty() {
        return Err(CoordinateError::EmptyHost);
    }

    let invalid = || CoordinateError::InvalidHost(host.clone());
    if host.contains(['/', '\\', '@', '?', '#']) || host.contains(char::is_whitespace) {
        return Err(invalid());
    }

    let parsed = Url::parse(&format!("https://{host}/")).map_err(|_| invalid())?;
    let authority = match parsed.port() {
        Some(port) => format!("{}:{port}", parsed.host_str().unwrap_or_default()),
        None => parsed.host_str().unwrap_or_default().to_string(),
    };
    if authority != host {
        return Err(invalid());
    }
    Ok(host)
}

fn normalize_owner_repo(owner_repo: &str) -> Result<String, CoordinateError> {
    let trimmed = owner_repo.trim().trim_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let segments: Vec<&str> = trimmed.split('/').collect();
    let valid_segment = |s: &&str| {
        !s.is_empty()
            && *s != "."
            && *s != ".."
            && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };

    if segments.len() < 2 || !segments.iter().all(valid_segment) {
        return Err(CoordinateError::InvalidOwnerRepo(owner_repo.to_string()));
    }
    Ok(segments.join("/"))
}
