//! Ingest command implementation.

use super::absolute;
use super::ensure_success;
use super::record_name;
use crate::cli::IngestArgs;
use crate::error::add_hints;
use crate::error::ensure_zip_extension;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use crate::records::RecordStore;
use crate::settings;
use anyhow::Result;
use anyhow::bail;
use statix_core::ContentStore;
use statix_core::Ingestor;
use statix_core::ZipReader;
use statix_core::formats::ArchiveReader;
use std::path::Path;

pub fn execute(
    args: &IngestArgs,
    config_path: Option<&Path>,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    ensure_zip_extension(&args.archive)?;
    let config = settings::load(config_path, &args.options)?;
    let root = absolute(&args.store.root)?;
    let records = RecordStore::new(&root);

    let record_id = &args.store.record;
    if records.load_job(record_id)?.is_some() {
        bail!(
            "record '{record_id}' has a step-wise ingestion in progress\n\
             HINT: Finish it with `statix step` or delete the record's file under {}/jobs.",
            root.display()
        );
    }

    let name = record_name(args.name.as_deref(), &args.archive, record_id);
    let mut record = records.load_or_new(record_id, &name)?;
    let mut archive = add_hints(ZipReader::open(&args.archive))?;
    let ingestor = Ingestor::new(ContentStore::new(&root), config);

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let result = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new(archive.members().len());
        add_hints(ingestor.ingest_with_progress(&mut record, &mut archive, &mut progress))?
    } else {
        add_hints(ingestor.ingest(&mut record, &mut archive))?
    };

    formatter.format_ingestion_result(&record, &result)?;
    ensure_success(record_id, &result)
}
