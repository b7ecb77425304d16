//! Render configuration file.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section.rs   # [policy], [repository], [render]
//! ├── error.rs     # ConfigError
//! └── mod.rs       # RenderConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                             |
//! |----------------|-----------------------------------------------------|
//! | `[policy]`     | Allowlist overrides on top of the Packagist table   |
//! | `[repository]` | Repository relative links and images resolve to     |
//! | `[render]`     | Post-processing and markdown flavor                 |

mod error;
mod section;

pub use error::ConfigError;
pub use section::{PolicySection, RenderSection, RepositorySection};

use std::{fs, path::Path};

use serde::Deserialize;

use crate::log;
use crate::render::Renderer;

/// Root of a render config file. An empty file means "render like
/// Packagist, no repository".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub policy: PolicySection,
    pub repository: Option<RepositorySection>,
    pub render: RenderSection,
}

impl RenderConfig {
    /// Parse config from a TOML string, warning about unknown fields.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::load(content, "config")
    }

    /// Load config from a file, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        Self::load(&content, &display_path)
    }

    fn load(content: &str, source: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:", source);
            for field in &ignored {
                eprintln!("- {field}");
            }
        }
        Ok(config)
    }

    /// Parse config and collect unknown field paths.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Validate every section and assemble a renderer.
    pub fn renderer(&self) -> Result<Renderer, ConfigError> {
        let mut renderer = Renderer::new(self.policy.to_policy()?)
            .with_markdown_options(self.render.markdown_options())
            .with_post_process(self.render.post_process);

        if let Some(repository) = &self.repository {
            renderer = renderer.with_repository(repository.to_coordinate()?);
        }
        Ok(renderer)
    }
}
