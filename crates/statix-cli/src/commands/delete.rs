//! Delete command implementation.

use super::absolute;
use crate::cli::DeleteArgs;
use crate::error::add_hints;
use crate::output::OutputFormatter;
use crate::records::RecordStore;
use anyhow::Result;
use anyhow::bail;
use statix_core::ContentRecord;
use statix_core::ContentStore;
use statix_core::IngestConfig;
use statix_core::Ingestor;

pub fn execute(args: &DeleteArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = absolute(&args.store.root)?;
    let records = RecordStore::new(&root);
    let record_id = &args.store.record;

    let Some(record) = records.load(record_id)? else {
        bail!(
            "record '{record_id}' not found under {}\n\
             HINT: Check --root and --record.",
            root.display()
        );
    };

    let ingestor = Ingestor::new(ContentStore::new(&root), IngestConfig::default());

    // A half-finished step-wise ingestion owns its own directory.
    if let Some(job) = records.load_job(record_id)? {
        if record.stored_address().as_ref() != Some(job.plan().address()) {
            add_hints(ingestor.store().retire(job.target()))?;
        }
        records.remove_job(record_id)?;
    }

    add_hints(ingestor.delete_content(&record))?;
    records.remove(&record)?;

    formatter.format_success("delete", &format!("Deleted record {record_id}"))
}
