//! Command-line interface module.

mod args;

pub use args::{Cli, InputFormat};

use anyhow::{Context, Result};
use readme_renderer::{RenderConfig, Rendered, RepositoryCoordinate, Renderer, debug, debug_do, log};
use std::fs;

/// Render the README named on the command line and print it to stdout.
pub fn run(cli: &Cli) -> Result<()> {
    if !cli.file.is_file() {
        log!("error"; "README file `{}` not found", cli.file.display());
        eprintln!("usage: readme-render README.md github.com mondeja/leptos-fluent");
        std::process::exit(1);
    }

    let rendered = render_file(cli)?;

    debug_do! {
        if !rendered.report.is_empty() {
            debug!("render"; "{} item(s) dropped:", rendered.report.len());
            eprint!("{}", rendered.report);
        }
    }

    println!("{}", rendered.html);
    Ok(())
}

/// Read and render `cli.file` with the renderer the arguments describe.
fn render_file(cli: &Cli) -> Result<Rendered> {
    let renderer = build_renderer(cli)?;
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read `{}`", cli.file.display()))?;

    match cli.format.resolve(&cli.file) {
        InputFormat::Html => renderer.render_html(&source),
        _ => renderer.render_markdown(&source),
    }
    .with_context(|| format!("failed to render `{}`", cli.file.display()))
}

/// Config file (or Packagist defaults), then command-line overrides.
fn build_renderer(cli: &Cli) -> Result<Renderer> {
    let config = match &cli.config {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => RenderConfig::default(),
    };
    let mut renderer = config.renderer()?;

    match (&cli.host, &cli.owner_repo) {
        (Some(host), Some(owner_repo)) => {
            let base_path = cli.base_path.as_deref().unwrap_or_default();
            let coordinate = RepositoryCoordinate::new(host, owner_repo, base_path)
                .context("invalid repository")?;
            debug!("render"; "repository: {}", coordinate);
            renderer = renderer.with_repository(coordinate);
        }
        (Some(host), None) => {
            log!("warning"; "host `{}` given without owner/repo, relative URLs are left as-is", host);
        }
        _ => {}
    }

    if cli.no_post_process {
        renderer = renderer.with_post_process(false);
    }
    Ok(renderer)
}
