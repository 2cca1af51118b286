//! Error conversion utilities for CLI.
//!
//! Converts statix-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use anyhow::bail;
use statix_core::IngestError;
use std::path::Path;

/// Converts `IngestError` to a user-friendly anyhow error.
pub fn convert_ingest_error(err: IngestError) -> anyhow::Error {
    match err {
        IngestError::InvalidConfiguration { reason } => {
            anyhow!(
                "Invalid configuration: {reason}\n\
                 HINT: --batch-size must be at least 1 and --entry must be a plain file name such as index.html."
            )
        }
        IngestError::UnreadableArchive { path, reason } => {
            anyhow!(
                "Cannot read archive '{}': {reason}\n\
                 HINT: The file may be truncated or corrupted. Only ZIP archives are supported.",
                path.display()
            )
        }
        IngestError::StorageUnavailable { path, source } => {
            anyhow!(
                "Cannot create storage directory '{}': {source}\n\
                 HINT: Check that --root is writable and that no file occupies the path.",
                path.display()
            )
        }
        IngestError::InvalidPath { path } => {
            anyhow!(
                "Refusing to delete '{}': it is not inside the static content root\n\
                 HINT: Only directories below <root>/static can be retired.",
                path.display()
            )
        }
        IngestError::Io(io_err) => anyhow!("I/O error: {io_err}"),
        other => anyhow::Error::from(other),
    }
}

/// Converts the error of a core result, adding hints.
pub fn add_hints<T>(result: Result<T, IngestError>) -> anyhow::Result<T> {
    result.map_err(convert_ingest_error)
}

/// Rejects uploads that are not `.zip` files.
pub fn ensure_zip_extension(archive: &Path) -> anyhow::Result<()> {
    let is_zip = archive
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if !is_zip {
        bail!(
            "'{}' is not a .zip file\n\
             HINT: Only ZIP archives with a .zip extension are accepted.",
            archive.display()
        );
    }
    Ok(())
}
