//! Render untrusted package READMEs into HTML that is safe to embed.
//!
//! Markdown is converted with GitHub-flavored extensions, the HTML is run
//! through an allowlist sanitizer, relative links and images are pointed at
//! the source repository's raw files, and a couple of presentation rewrites
//! are applied on top.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── core/          # LinkKind classification
//! ├── utils/         # escaping, attribute parsing, URL helpers
//! ├── resolve/       # RepositoryCoordinate, raw-content URL resolution
//! ├── sanitize/      # policy, rewrite rules, tree walk, drop report
//! ├── postprocess    # title strip, CDN rewrite
//! ├── markdown       # pulldown-cmark conversion
//! ├── render         # Renderer: the whole pipeline
//! ├── config/        # TOML render config
//! └── logger         # log!/debug! macros
//! ```
//!
//! # Example
//!
//! ```
//! use readme_renderer::{Renderer, RepositoryCoordinate};
//!
//! let repo = RepositoryCoordinate::new("github.com", "mondeja/leptos-fluent", "")?;
//! let renderer = Renderer::default().with_repository(repo);
//!
//! let rendered = renderer.render_markdown("# Title\n\n[docs](docs/x.md)")?;
//! assert!(rendered.html.contains(
//!     "https://raw.githubusercontent.com/mondeja/leptos-fluent/HEAD/docs/x.md"
//! ));
//! assert!(!rendered.html.contains("<h1>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod markdown;
pub mod postprocess;
pub mod render;
pub mod resolve;
pub mod sanitize;
pub mod utils;

pub use config::{ConfigError, RenderConfig};
pub use error::RenderError;
pub use markdown::markdown_to_html;
pub use postprocess::post_process;
pub use render::{Rendered, Renderer};
pub use resolve::{CoordinateError, Forge, RepositoryCoordinate};
pub use sanitize::{DropReason, DropReport, PolicyBuilder, SanitizationPolicy, SanitizationResult};
