//! Command implementations.

pub mod completion;
pub mod delete;
pub mod ingest;
pub mod plan;
pub mod retire;
pub mod step;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use statix_core::IngestionResult;
use std::path::Path;
use std::path::PathBuf;

/// Resolves a command-line path against the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("failed to resolve '{}'", path.display()))
}

/// Name for a new record: `--name`, else the archive's file stem.
fn record_name(name: Option<&str>, archive: &Path, record_id: &str) -> String {
    name.map(ToString::to_string)
        .or_else(|| {
            archive
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| record_id.to_string())
}

/// Turns an unsuccessful ingestion into a non-zero exit.
fn ensure_success(record_id: &str, result: &IngestionResult) -> Result<()> {
    if !result.success {
        bail!(
            "ingestion for record '{record_id}' failed: {} batch(es) could not be extracted\n\
             HINT: The record still points at its previous content. Fix the archive and ingest again.",
            result.failures.len()
        );
    }
    Ok(())
}
