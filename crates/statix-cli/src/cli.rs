//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "statix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Read ingestion settings from a TOML file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest an archive for a record in one go
    Ingest(IngestArgs),
    /// Run the next extraction batch of a record's pending ingestion
    Step(IngestArgs),
    /// Show the address and batches an archive would be extracted in
    Plan(PlanArgs),
    /// Delete a record and its extracted content
    Delete(DeleteArgs),
    /// Remove a content directory below the static root
    Retire(RetireArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Storage root and record selection shared by record-level commands.
#[derive(clap::Args)]
pub struct StoreArgs {
    /// Storage root holding static/, records/ and jobs/
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Record identifier
    #[arg(long, value_name = "ID")]
    pub record: String,
}

/// Overrides for the configured ingestion settings.
#[derive(clap::Args)]
pub struct PlanOptions {
    /// Members extracted per batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// File name of the entry-point document
    #[arg(long, value_name = "NAME")]
    pub entry: Option<String>,
}

#[derive(clap::Args)]
pub struct IngestArgs {
    /// Path to the ZIP archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Display name for a new record (default: archive file name)
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub options: PlanOptions,
}

#[derive(clap::Args)]
pub struct PlanArgs {
    /// Path to the ZIP archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Record identifier the content would belong to
    #[arg(long, value_name = "ID")]
    pub record: String,

    /// List the members of every batch
    #[arg(short, long)]
    pub long: bool,

    #[command(flatten)]
    pub options: PlanOptions,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(clap::Args)]
pub struct RetireArgs {
    /// Directory to remove
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Storage root holding static/
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}
