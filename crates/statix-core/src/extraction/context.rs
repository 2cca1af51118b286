//! Progress state threaded across batch executions.

use serde::Deserialize;
use serde::Serialize;

use crate::BatchFailure;
use crate::BatchOutcome;

/// Running progress of one extraction plan.
///
/// The context is a plain value: a job runner that executes one batch per
/// invocation serializes it between calls and hands it back unchanged.
///
/// # Examples
///
/// ```
/// use statix_core::BatchOutcome;
/// use statix_core::ExtractionContext;
///
/// let mut context = ExtractionContext::new(4);
/// let mut outcome = BatchOutcome::new(0);
/// outcome.extracted.push("index.html".to_string());
/// context.record(&outcome);
///
/// assert_eq!(context.batches_completed, 1);
/// assert!((context.progress - 0.25).abs() < f64::EPSILON);
/// assert_eq!(context.next_batch(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionContext {
    /// Number of batches executed so far, successful or not.
    pub batches_completed: usize,
    /// Total number of batches in the plan.
    pub total_batches: usize,
    /// Members written so far, in extraction order.
    pub extracted: Vec<String>,
    /// Bytes of file content written so far.
    pub bytes_written: u64,
    /// Batches that stopped at a failing member.
    pub failures: Vec<BatchFailure>,
    /// Status line describing the last completed step.
    pub message: String,
    /// Completed fraction in `[0.0, 1.0]`.
    pub progress: f64,
}

impl ExtractionContext {
    /// Creates the context for a plan of `total_batches` batches.
    #[must_use]
    pub fn new(total_batches: usize) -> Self {
        let mut context = Self {
            batches_completed: 0,
            total_batches,
            extracted: Vec::new(),
            bytes_written: 0,
            failures: Vec::new(),
            message: String::new(),
            progress: 0.0,
        };
        context.progress = context.fraction();
        context
    }

    /// Merges the outcome of the next batch into the running totals.
    pub fn record(&mut self, outcome: &BatchOutcome) {
        self.batches_completed += 1;
        self.extracted.extend(outcome.extracted.iter().cloned());
        self.bytes_written = self.bytes_written.saturating_add(outcome.bytes_written);
        self.message = match &outcome.failure {
            Some(failure) => {
                self.failures.push(failure.clone());
                format!("Failed {failure}")
            }
            None => format!(
                "Extracted batch {} of {}",
                outcome.batch_index + 1,
                self.total_batches
            ),
        };
        self.progress = self.fraction();
    }

    /// Returns the index of the next batch to run, or `None` when done.
    #[must_use]
    pub fn next_batch(&self) -> Option<usize> {
        (self.batches_completed < self.total_batches).then_some(self.batches_completed)
    }

    /// Returns `true` once every batch has run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.batches_completed >= self.total_batches
    }

    /// Returns `true` if any batch failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    #[allow(clippy::cast_precision_loss)]
    fn fraction(&self) -> f64 {
        if self.total_batches == 0 {
            return 1.0;
        }
        self.batches_completed as f64 / self.total_batches as f64
    }
}
