//! Content-addressed ingestion of static site archives.
//!
//! `statix-core` takes an uploaded ZIP archive of web assets, derives a
//! deterministic storage directory for it from the owning record and the
//! archive's member list, and extracts the members in bounded batches so a
//! host can report progress and resume between invocations. Superseded
//! directories are retired once the record points at new content.
//!
//! # Examples
//!
//! ```no_run
//! use statix_core::ContentStore;
//! use statix_core::IngestConfig;
//! use statix_core::Ingestor;
//! use statix_core::ZipReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ingestor = Ingestor::new(ContentStore::new("/srv/files"), IngestConfig::default());
//! let mut archive = ZipReader::open("site.zip")?;
//!
//! let mut job = ingestor.begin("42", &archive)?;
//! while let Some(outcome) = job.execute_next(&mut archive) {
//!     println!("{:.0}% ({} files)", job.context().progress * 100.0, outcome.extracted.len());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod config;
mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod ingest;
pub mod lifecycle;
pub mod plan;
pub mod record;
pub mod report;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use address::ContentAddress;
pub use config::IngestConfig;
pub use error::IngestError;
pub use error::Result;
pub use extraction::ExtractionContext;
pub use extraction::extract_batch;
pub use formats::ZipReader;
pub use ingest::IngestionJob;
pub use ingest::Ingestor;
pub use ingest::JobState;
pub use lifecycle::ContentStore;
pub use plan::ExtractionBatch;
pub use plan::ExtractionPlan;
pub use record::ContentRecord;
pub use report::BatchFailure;
pub use report::BatchOutcome;
pub use report::IngestionResult;
pub use report::NoopProgress;
pub use report::ProgressCallback;
