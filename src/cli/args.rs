//! Command-line interface definitions.

use clap::{ColorChoice, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Render a README the way Packagist shows it: sanitized, with relative
/// links and images pointed at the repository's raw files.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// README file to render (markdown or HTML)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Repository host (e.g., github.com)
    pub host: Option<String>,

    /// Repository as owner/repo (e.g., mondeja/leptos-fluent)
    #[arg(requires = "host")]
    pub owner_repo: Option<String>,

    /// Directory of the README inside the repository (e.g., docs/)
    #[arg(short, long, requires = "owner_repo")]
    pub base_path: Option<String>,

    /// Policy config file (default: the Packagist policy)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Input format (default: from the file extension)
    #[arg(short, long, default_value = "auto")]
    pub format: InputFormat,

    /// Skip the title strip and CDN image rewrite
    #[arg(long)]
    pub no_post_process: bool,

    /// Show what was dropped and why
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Auto,
    Markdown,
    Html,
}

impl InputFormat {
    /// Resolve `Auto` from the file extension; anything that is not
    /// `.html`/`.htm` is read as markdown.
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
                    Self::Html
                }
                _ => Self::Markdown,
            },
            other => other,
        }
    }
}
