//! Statix CLI - ingest static site archives into content-addressed storage.

mod cli;
mod commands;
mod error;
mod output;
mod progress;
mod records;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let config = cli.config.as_deref();
    let show_progress = !cli.quiet && !cli.json;

    match &cli.command {
        cli::Commands::Ingest(args) => {
            commands::ingest::execute(args, config, &*formatter, show_progress)
        }
        cli::Commands::Step(args) => commands::step::execute(args, config, &*formatter),
        cli::Commands::Plan(args) => commands::plan::execute(args, config, &*formatter),
        cli::Commands::Delete(args) => commands::delete::execute(args, &*formatter),
        cli::Commands::Retire(args) => commands::retire::execute(args, &*formatter),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
