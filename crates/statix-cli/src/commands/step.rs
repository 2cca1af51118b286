//! Step command: one extraction batch per invocation.
//!
//! The first invocation plans the ingestion; every invocation runs the next
//! batch and saves the job under `<root>/jobs`. The invocation that runs the
//! last batch finalizes the record.

use super::absolute;
use super::ensure_success;
use super::record_name;
use crate::cli::IngestArgs;
use crate::error::add_hints;
use crate::error::ensure_zip_extension;
use crate::output::OutputFormatter;
use crate::records::RecordStore;
use crate::settings;
use anyhow::Result;
use statix_core::ContentStore;
use statix_core::Ingestor;
use statix_core::ZipReader;
use std::path::Path;
use tracing::info;

pub fn execute(
    args: &IngestArgs,
    config_path: Option<&Path>,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    ensure_zip_extension(&args.archive)?;
    let root = absolute(&args.store.root)?;
    let records = RecordStore::new(&root);
    let store = ContentStore::new(&root);
    let record_id = &args.store.record;

    let mut archive = add_hints(ZipReader::open(&args.archive))?;

    let mut job = if let Some(job) = records.load_job(record_id)? {
        info!(record = %record_id, completed = job.context().batches_completed, "resuming job");
        job
    } else {
        let config = settings::load(config_path, &args.options)?;
        let ingestor = Ingestor::new(store.clone(), config);
        add_hints(ingestor.begin(record_id, &archive))?
    };

    let outcome = job.execute_next(&mut archive);
    formatter.format_step(&job, outcome.as_ref())?;

    if !job.context().is_complete() {
        return records.save_job(&job);
    }

    let name = record_name(args.name.as_deref(), &args.archive, record_id);
    let mut record = records.load_or_new(record_id, &name)?;
    let finalized = job.finalize(&mut record, &store);
    records.remove_job(record_id)?;
    let result = add_hints(finalized)?;

    formatter.format_ingestion_result(&record, &result)?;
    ensure_success(record_id, &result)
}
