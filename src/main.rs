//! `pls-docs` records `pls` with `to-html` and cleans up the HTML for the `pls` documentation.

use std::io::Write;

use camino::Utf8Path;
use clap::Parser;
use miette::Context;
use miette::IntoDiagnostic;
use pls_docs::cleanup_html;
use pls_docs::cli;
use pls_docs::run_to_html;
use pls_docs::SystemRunner;
use pls_docs::TracingOpts;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();
    // Settings may live in a `.env` file; variables which are already set take precedence.
    // Load it before parsing arguments so it can set `TO_HTML`, `RUST_LOG`, and so on.
    let dotenv = dotenvy::dotenv();
    let mut opts = cli::Opts::parse();
    opts.init();
    TracingOpts::from_cli(&opts).install()?;

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => {
            return Err(err)
                .into_diagnostic()
                .wrap_err("Failed to load `.env` file");
        }
    }

    let html = match &opts.command {
        cli::Command::Render(render) => {
            run_to_html(&SystemRunner, render.args.as_slice(), &render.run_opts())?
        }
        cli::Command::Clean(clean) => {
            let html = read_input(clean.input.as_deref())?;
            cleanup_html(&html)?
        }
    };

    match &opts.output {
        Some(path) => {
            std::fs::write(path, &html)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {path}"))?;
            tracing::info!(%path, "Wrote HTML");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.flush())
                .into_diagnostic()
                .wrap_err("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Utf8Path>) -> miette::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {path}")),
        None => std::io::read_to_string(std::io::stdin())
            .into_diagnostic()
            .wrap_err("Failed to read stdin"),
    }
}
