//! modgraph CLI - plans module compilation for plugin builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use modgraph::core::ManifestError;
use modgraph::ops::ManifestSource;
use modgraph::util::diagnostic::{emit, suggestions, Diagnostic};
use modgraph::util::GlobalContext;
use modgraph::ConfigError;

fn main() {
    let cli = Cli::parse();

    let ctx = match GlobalContext::new() {
        Ok(mut ctx) => {
            ctx.set_verbose(cli.verbose);
            ctx.set_color(!cli.no_color);
            ctx
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, &ctx) {
        report(&e, ctx.color());
        std::process::exit(1);
    }
}

fn run(cli: Cli, ctx: &GlobalContext) -> Result<()> {
    // Set up logging
    let filter = if ctx.is_verbose() {
        EnvFilter::new("modgraph=debug")
    } else {
        EnvFilter::new("modgraph=info")
    };

    // stdout carries plans and JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ctx.color())
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(ctx, args),
        Commands::Check(args) => commands::check::execute(ctx, args),
        Commands::Tree(args) => commands::tree::execute(ctx, args),
        Commands::Explain(args) => commands::explain::execute(ctx, args),
        Commands::Catalog => commands::catalog::execute(),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print configuration errors as diagnostics, everything else as a chain.
fn report(err: &anyhow::Error, color: bool) {
    if let Some(config_err) = err.downcast_ref::<ConfigError>() {
        let mut diag = config_err.to_diagnostic();
        if let Some(path) = err
            .downcast_ref::<ManifestSource>()
            .and_then(|source| source.path.as_deref())
        {
            diag = diag.with_location(path);
        }
        emit(&diag, color);
    } else if let Some(manifest_err) = err.downcast_ref::<ManifestError>() {
        emit(
            &Diagnostic::error(manifest_err.to_string()).with_suggestion(suggestions::NO_MANIFEST),
            color,
        );
    } else if let Some(diag) = err.downcast_ref::<Diagnostic>() {
        emit(diag, color);
    } else {
        eprintln!("error: {:#}", err);
    }
}
