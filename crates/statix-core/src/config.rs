//! Ingestion configuration.

use serde::Deserialize;
use serde::Serialize;

use crate::IngestError;
use crate::Result;

/// Default number of archive members extracted per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default file name designating the entry-point document.
pub const DEFAULT_ENTRY_SENTINEL: &str = "index.html";

/// Settings that shape how an archive is planned and extracted.
///
/// # Examples
///
/// ```
/// use statix_core::IngestConfig;
///
/// let config = IngestConfig {
///     batch_size: 25,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.entry_sentinel, "index.html");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Maximum number of members extracted per batch.
    pub batch_size: usize,

    /// Base file name of the entry-point document.
    pub entry_sentinel: String,
}

impl Default for IngestConfig {
    /// Default values:
    /// - `batch_size`: 10
    /// - `entry_sentinel`: `index.html`
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            entry_sentinel: DEFAULT_ENTRY_SENTINEL.to_string(),
        }
    }
}

impl IngestConfig {
    /// Checks the configuration before any I/O takes place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero batch size or a sentinel
    /// that is not a single plain file name.
    pub fn validate(&self) -> Result<()> {
        validate_batch_size(self.batch_size)?;
        validate_sentinel(&self.entry_sentinel)
    }
}

pub(crate) fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(IngestError::config("batch size must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_sentinel(sentinel: &str) -> Result<()> {
    if sentinel.is_empty() {
        return Err(IngestError::config("entry sentinel must not be empty"));
    }
    if sentinel == "." || sentinel == ".." {
        return Err(IngestError::config(format!(
            "entry sentinel '{sentinel}' is not a file name"
        )));
    }
    if sentinel.contains(['/', '\\', '\0']) {
        return Err(IngestError::config(format!(
            "entry sentinel '{}' must be a single path component",
            sentinel.escape_debug()
        )));
    }
    Ok(())
}
