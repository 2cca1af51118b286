//! Batch outcomes, ingestion results and progress reporting.

use serde::Deserialize;
use serde::Serialize;

use crate::ContentAddress;
use crate::ExtractionBatch;
use crate::IngestError;

/// Record of one batch that could not be fully extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Zero-based index of the failed batch.
    pub batch_index: usize,
    /// Member that failed, when the failure is tied to one.
    pub member: Option<String>,
    /// Human-readable reason.
    pub reason: String,
}

impl BatchFailure {
    /// Builds a failure record for `batch_index` from an extraction error.
    #[must_use]
    pub fn from_error(batch_index: usize, error: &IngestError) -> Self {
        match error {
            IngestError::ExtractionFailure { member, reason } => Self {
                batch_index,
                member: Some(member.clone()),
                reason: reason.clone(),
            },
            other => Self {
                batch_index,
                member: None,
                reason: other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.member {
            Some(member) => write!(
                f,
                "batch {}: '{member}': {}",
                self.batch_index + 1,
                self.reason
            ),
            None => write!(f, "batch {}: {}", self.batch_index + 1, self.reason),
        }
    }
}

/// Result of executing one extraction batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Zero-based index of the batch.
    pub batch_index: usize,
    /// Members written to disk, in extraction order.
    pub extracted: Vec<String>,
    /// Bytes of file content written.
    pub bytes_written: u64,
    /// Set when the batch stopped at a failing member.
    pub failure: Option<BatchFailure>,
}

impl BatchOutcome {
    /// Creates an empty, successful outcome for `batch_index`.
    #[must_use]
    pub fn new(batch_index: usize) -> Self {
        Self {
            batch_index,
            extracted: Vec::new(),
            bytes_written: 0,
            failure: None,
        }
    }

    /// Returns `true` if every member of the batch was extracted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Final accounting of one ingestion attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Content address the archive was extracted into.
    pub address: ContentAddress,
    /// Entry-point member, or `""` when the archive has none.
    pub entry_point: String,
    /// `<address>/<entry point>`.
    pub entry_url: String,
    /// Number of members listed by the archive.
    pub members_requested: usize,
    /// Number of members written to disk.
    pub members_extracted: usize,
    /// Bytes of file content written.
    pub bytes_written: u64,
    /// Failures of individual batches.
    pub failures: Vec<BatchFailure>,
    /// `true` when every batch succeeded and the record now points at the
    /// new content.
    pub success: bool,
    /// Non-fatal problems, such as a superseded directory that could not be
    /// retired.
    pub warnings: Vec<String>,
}

impl IngestionResult {
    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns whether the archive lacked an entry-point document.
    #[must_use]
    pub fn missing_entry_point(&self) -> bool {
        self.entry_point.is_empty()
    }
}

/// Callback trait for progress reporting during extraction.
///
/// # Examples
///
/// ```
/// use statix_core::BatchOutcome;
/// use statix_core::ExtractionBatch;
/// use statix_core::ProgressCallback;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_batch_start(&mut self, batch: &ExtractionBatch, total_batches: usize) {
///         println!("batch {}/{}", batch.index + 1, total_batches);
///     }
///
///     fn on_member_extracted(&mut self, member: &str, _bytes: u64) {
///         println!("  {member}");
///     }
///
///     fn on_batch_complete(&mut self, outcome: &BatchOutcome) {
///         if let Some(failure) = &outcome.failure {
///             println!("  failed: {failure}");
///         }
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback {
    /// Called before a batch starts.
    fn on_batch_start(&mut self, batch: &ExtractionBatch, total_batches: usize);

    /// Called after each member has been written.
    fn on_member_extracted(&mut self, member: &str, bytes: u64);

    /// Called once a batch has finished, successfully or not.
    fn on_batch_complete(&mut self, outcome: &BatchOutcome);

    /// Called when every batch has run.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_batch_start(&mut self, _batch: &ExtractionBatch, _total_batches: usize) {}

    fn on_member_extracted(&mut self, _member: &str, _bytes: u64) {}

    fn on_batch_complete(&mut self, _outcome: &BatchOutcome) {}

    fn on_complete(&mut self) {}
}
