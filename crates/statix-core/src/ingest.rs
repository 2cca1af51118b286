//! Ingestion orchestration.
//!
//! An ingestion moves through `Planning → Preparing → Extracting → Finalizing`
//! and ends in `Done` or `Failed`. [`Ingestor::ingest`] runs the whole
//! sequence in one call. Hosts that drive batches from their own scheduler
//! use [`Ingestor::begin`] to get an [`IngestionJob`], persist it between
//! invocations, and call [`IngestionJob::finalize`] after the last batch.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::BatchOutcome;
use crate::ContentAddress;
use crate::ContentRecord;
use crate::ContentStore;
use crate::ExtractionBatch;
use crate::ExtractionContext;
use crate::ExtractionPlan;
use crate::IngestConfig;
use crate::IngestError;
use crate::IngestionResult;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::extract_batch_with_progress;
use crate::extraction::extract_whole;
use crate::formats::ArchiveReader;

/// Phase of an ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Computing the content address and batch plan.
    Planning,
    /// Creating the storage directory.
    Preparing,
    /// Running batches in plan order.
    Extracting,
    /// Every batch has run; the record has not been updated yet.
    Finalizing,
    /// The record points at the new content.
    Done,
    /// At least one batch failed; the record was left untouched.
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Planning => "planning",
            Self::Preparing => "preparing",
            Self::Extracting => "extracting",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Entry point for ingesting archives into a [`ContentStore`].
///
/// # Examples
///
/// ```no_run
/// use statix_core::ContentStore;
/// use statix_core::IngestConfig;
/// use statix_core::Ingestor;
/// use statix_core::ZipReader;
/// # use statix_core::{ContentAddress, ContentRecord};
/// # struct Page { id: String, address: Option<ContentAddress> }
/// # impl ContentRecord for Page {
/// #     fn id(&self) -> &str { &self.id }
/// #     fn stored_address(&self) -> Option<ContentAddress> { self.address.clone() }
/// #     fn set_address_and_url(&mut self, a: &ContentAddress, _url: &str) -> statix_core::Result<()> {
/// #         self.address = Some(a.clone());
/// #         Ok(())
/// #     }
/// #     fn save(&mut self) -> statix_core::Result<()> { Ok(()) }
/// # }
///
/// # fn main() -> statix_core::Result<()> {
/// let ingestor = Ingestor::new(ContentStore::new("/srv/files"), IngestConfig::default());
/// let mut record = Page { id: "12".to_string(), address: None };
/// let mut archive = ZipReader::open("site.zip")?;
///
/// let result = ingestor.ingest(&mut record, &mut archive)?;
/// if result.success {
///     println!("serving {}", result.entry_url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: ContentStore,
    config: IngestConfig,
}

impl Ingestor {
    /// Creates an ingestor writing into `store`.
    #[must_use]
    pub fn new(store: ContentStore, config: IngestConfig) -> Self {
        Self { store, config }
    }

    /// Returns the content store.
    #[must_use]
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Returns the ingestion configuration.
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingests `archive` for `record`, running every batch in order.
    ///
    /// Batch failures do not abort the run; they are collected in the
    /// result, whose `success` flag is then `false` and the record is left
    /// pointing at its previous content.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an unusable configuration,
    /// `StorageUnavailable` if the storage directory cannot be created, and
    /// `Record` if the record rejects its new address.
    pub fn ingest<A, R>(&self, record: &mut R, archive: &mut A) -> Result<IngestionResult>
    where
        A: ArchiveReader + ?Sized,
        R: ContentRecord + ?Sized,
    {
        self.ingest_with_progress(record, archive, &mut NoopProgress)
    }

    /// Like [`ingest`](Self::ingest), reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// See [`ingest`](Self::ingest).
    pub fn ingest_with_progress<A, R>(
        &self,
        record: &mut R,
        archive: &mut A,
        progress: &mut dyn ProgressCallback,
    ) -> Result<IngestionResult>
    where
        A: ArchiveReader + ?Sized,
        R: ContentRecord + ?Sized,
    {
        let mut job = self.begin(record.id(), &*archive)?;
        while job.execute_next_with_progress(archive, progress).is_some() {}
        progress.on_complete();
        job.finalize(record, &self.store)
    }

    /// Plans an ingestion and prepares its storage directory.
    ///
    /// The returned job is ready to run its first batch. Nothing that the
    /// record currently points at is touched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` or `StorageUnavailable`.
    pub fn begin<A: ArchiveReader + ?Sized>(
        &self,
        record_id: &str,
        archive: &A,
    ) -> Result<IngestionJob> {
        debug!(record = record_id, state = %JobState::Planning, "ingestion started");
        self.config.validate()?;

        let members = archive.members();
        let address = ContentAddress::compute(record_id, members);
        let plan = ExtractionPlan::with_config(address, members, &self.config)?;

        debug!(
            record = record_id,
            state = %JobState::Preparing,
            address = %plan.address(),
            batches = plan.total_batches(),
            "plan ready"
        );
        let target = self.store.prepare_directory(plan.address())?;

        let context = ExtractionContext::new(plan.total_batches());
        info!(
            record = record_id,
            address = %plan.address(),
            members = plan.member_count(),
            batches = plan.total_batches(),
            "extracting archive"
        );

        Ok(IngestionJob {
            record_id: record_id.to_string(),
            plan,
            context,
            target,
            state: JobState::Extracting,
        })
    }

    /// Retires the directory `record` currently points at.
    ///
    /// Records without stored content are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` or `Io` from the store.
    pub fn delete_content<R: ContentRecord + ?Sized>(&self, record: &R) -> Result<()> {
        match record.stored_address() {
            Some(address) => {
                info!(record = record.id(), %address, "deleting record content");
                self.store.retire_address(&address)
            }
            None => Ok(()),
        }
    }
}

/// A planned ingestion whose batches are driven by the caller.
///
/// The job is serializable: a host can store it after any batch and resume
/// with a freshly opened archive later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionJob {
    record_id: String,
    plan: ExtractionPlan,
    context: ExtractionContext,
    target: PathBuf,
    state: JobState,
}

impl IngestionJob {
    /// Returns the identifier of the record being ingested.
    #[must_use]
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// Returns the extraction plan.
    #[must_use]
    pub fn plan(&self) -> &ExtractionPlan {
        &self.plan
    }

    /// Returns the progress so far.
    #[must_use]
    pub fn context(&self) -> &ExtractionContext {
        &self.context
    }

    /// Returns the directory batches are extracted into.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the current phase.
    #[must_use]
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Returns every batch paired with the total batch count, in order.
    #[must_use]
    pub fn plan_operations(&self) -> Vec<(ExtractionBatch, usize)> {
        let total = self.plan.total_batches();
        self.plan
            .batches()
            .iter()
            .map(|batch| (batch.clone(), total))
            .collect()
    }

    /// Returns the batch that must run next, if any.
    #[must_use]
    pub fn next_batch(&self) -> Option<&ExtractionBatch> {
        if self.state != JobState::Extracting {
            return None;
        }
        self.context
            .next_batch()
            .and_then(|index| self.plan.batch(index))
    }

    /// Runs `batch`, which must be the next batch of the plan.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the batch is not the next one or
    /// the job is no longer extracting. Failures inside the batch are
    /// reported in the returned outcome, not as an error.
    pub fn execute_one<A: ArchiveReader + ?Sized>(
        &mut self,
        archive: &mut A,
        batch: &ExtractionBatch,
    ) -> Result<BatchOutcome> {
        self.execute_one_with_progress(archive, batch, &mut NoopProgress)
    }

    /// Like [`execute_one`](Self::execute_one), reporting progress.
    ///
    /// # Errors
    ///
    /// See [`execute_one`](Self::execute_one).
    pub fn execute_one_with_progress<A: ArchiveReader + ?Sized>(
        &mut self,
        archive: &mut A,
        batch: &ExtractionBatch,
        progress: &mut dyn ProgressCallback,
    ) -> Result<BatchOutcome> {
        if self.state != JobState::Extracting {
            return Err(IngestError::config(format!(
                "cannot run batch {}: job is {}",
                batch.index + 1,
                self.state
            )));
        }

        let expected = self.next_batch();
        if expected != Some(batch) {
            return Err(IngestError::config(match expected {
                Some(next) => format!(
                    "batch {} requested but batch {} is next",
                    batch.index + 1,
                    next.index + 1
                ),
                None => "every batch has already run".to_string(),
            }));
        }

        Ok(self.run(archive, batch, progress))
    }

    /// Runs the next batch, or returns `None` once every batch has run.
    pub fn execute_next<A: ArchiveReader + ?Sized>(
        &mut self,
        archive: &mut A,
    ) -> Option<BatchOutcome> {
        self.execute_next_with_progress(archive, &mut NoopProgress)
    }

    /// Like [`execute_next`](Self::execute_next), reporting progress.
    pub fn execute_next_with_progress<A: ArchiveReader + ?Sized>(
        &mut self,
        archive: &mut A,
        progress: &mut dyn ProgressCallback,
    ) -> Option<BatchOutcome> {
        let batch = self.next_batch()?.clone();
        Some(self.run(archive, &batch, progress))
    }

    fn run<A: ArchiveReader + ?Sized>(
        &mut self,
        archive: &mut A,
        batch: &ExtractionBatch,
        progress: &mut dyn ProgressCallback,
    ) -> BatchOutcome {
        let total = self.plan.total_batches();
        progress.on_batch_start(batch, total);

        let whole = self.plan.is_single_batch() && archive.members() == batch.members.as_slice();
        let outcome = if whole {
            extract_whole(archive, &self.target, batch.index, progress)
        } else {
            extract_batch_with_progress(archive, &self.target, batch, progress)
        };

        self.context.record(&outcome);
        debug!(
            record = %self.record_id,
            batch = batch.index + 1,
            total,
            progress = self.context.progress,
            "{}",
            self.context.message
        );

        if self.context.is_complete() {
            self.state = JobState::Finalizing;
        }

        progress.on_batch_complete(&outcome);
        outcome
    }

    /// Completes the job once every batch has run.
    ///
    /// On success the record is pointed at the new content and saved in one
    /// step, then the directory it used to point at is retired. A retirement
    /// problem becomes a warning in the result. If any batch failed the
    /// record is left as it was and the new directory stays on disk.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if batches are still pending, the job
    /// was already finalized, or `record` is not the record the job was
    /// planned for. Returns `Record` if the record cannot be updated.
    pub fn finalize<R: ContentRecord + ?Sized>(
        &mut self,
        record: &mut R,
        store: &ContentStore,
    ) -> Result<IngestionResult> {
        match self.state {
            JobState::Finalizing => {}
            JobState::Extracting if self.context.is_complete() => {}
            JobState::Extracting => {
                return Err(IngestError::config(format!(
                    "{} of {} batches still pending",
                    self.context.total_batches - self.context.batches_completed,
                    self.context.total_batches
                )));
            }
            other => {
                return Err(IngestError::config(format!(
                    "cannot finalize: job is {other}"
                )));
            }
        }

        if record.id() != self.record_id {
            return Err(IngestError::config(format!(
                "job was planned for record '{}', not '{}'",
                self.record_id,
                record.id()
            )));
        }

        let mut result = self.result();

        if self.context.has_failures() {
            self.state = JobState::Failed;
            warn!(
                record = %self.record_id,
                failed_batches = self.context.failures.len(),
                "ingestion failed; record left unchanged"
            );
            return Ok(result);
        }

        let previous = record.stored_address();
        let address = self.plan.address();

        let updated = record
            .set_address_and_url(address, &result.entry_url)
            .and_then(|()| record.save());
        if let Err(e) = updated {
            self.state = JobState::Failed;
            return Err(e);
        }

        if let Some(previous) = previous.filter(|p| p != address) {
            if let Err(e) = store.retire_address(&previous) {
                warn!(record = %self.record_id, %previous, error = %e, "could not retire superseded content");
                result
                    .warnings
                    .push(format!("superseded content {previous} was not removed: {e}"));
            }
        }

        self.state = JobState::Done;
        result.success = true;
        info!(
            record = %self.record_id,
            %address,
            entry = %result.entry_url,
            "ingestion complete"
        );
        Ok(result)
    }

    fn result(&self) -> IngestionResult {
        IngestionResult {
            address: self.plan.address().clone(),
            entry_point: self.plan.entry_point().to_string(),
            entry_url: self.plan.entry_url(),
            members_requested: self.plan.member_count(),
            members_extracted: self.context.extracted.len(),
            bytes_written: self.context.bytes_written,
            failures: self.context.failures.clone(),
            success: false,
            warnings: Vec::new(),
        }
    }
}
