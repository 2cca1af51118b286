//! Extraction of a single batch of archive members.

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::BatchFailure;
use crate::BatchOutcome;
use crate::ExtractionBatch;
use crate::IngestError;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::formats::ArchiveReader;
use crate::types::MemberPath;

const PARTIAL_SUFFIX: &str = ".partial";

/// Extracts the members of `batch` into `target`.
///
/// Members are written in batch order and extraction stops at the first
/// member that cannot be read or written. Files written before the failure
/// stay on disk; running the batch again overwrites them. A member that
/// fails never replaces a file already present at its path.
///
/// # Examples
///
/// ```no_run
/// use statix_core::ContentAddress;
/// use statix_core::ExtractionPlan;
/// use statix_core::ZipReader;
/// use statix_core::extract_batch;
/// use statix_core::formats::ArchiveReader;
/// use std::path::Path;
///
/// # fn main() -> statix_core::Result<()> {
/// let mut archive = ZipReader::open("site.zip")?;
/// let members = archive.members().to_vec();
/// let plan = ExtractionPlan::new(ContentAddress::compute("1", &members), &members, 10, "index.html")?;
///
/// for batch in plan.batches() {
///     let outcome = extract_batch(&mut archive, Path::new("/srv/static/out"), batch);
///     println!("batch {}: {} files", batch.index + 1, outcome.extracted.len());
/// }
/// # Ok(())
/// # }
/// ```
pub fn extract_batch<A: ArchiveReader + ?Sized>(
    archive: &mut A,
    target: &Path,
    batch: &ExtractionBatch,
) -> BatchOutcome {
    extract_batch_with_progress(archive, target, batch, &mut NoopProgress)
}

/// Like [`extract_batch`], reporting each written member to `progress`.
pub fn extract_batch_with_progress<A: ArchiveReader + ?Sized>(
    archive: &mut A,
    target: &Path,
    batch: &ExtractionBatch,
    progress: &mut dyn ProgressCallback,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::new(batch.index);
    let mut buffer = CopyBuffer::new();

    for (index, name) in batch.entries() {
        // A reopened archive must still list the member where the plan put it.
        let result = if archive.members().get(index).map(String::as_str) == Some(name) {
            extract_member(archive, index, name, target, &mut buffer)
        } else {
            Err(IngestError::ExtractionFailure {
                member: name.to_string(),
                reason: format!("archive no longer lists this member at position {index}"),
            })
        };

        if !apply(&mut outcome, name, result, progress) {
            break;
        }
    }

    outcome
}

/// Extracts every member of the archive as batch `batch_index`.
///
/// Used when a plan has a single batch: members are taken straight from the
/// archive listing without cross-checking them against the plan, and the
/// resulting tree is the same as extracting the batch member by member.
pub fn extract_whole<A: ArchiveReader + ?Sized>(
    archive: &mut A,
    target: &Path,
    batch_index: usize,
    progress: &mut dyn ProgressCallback,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::new(batch_index);
    let mut buffer = CopyBuffer::new();
    let names = archive.members().to_vec();

    for (index, name) in names.iter().enumerate() {
        let result = extract_member(archive, index, name, target, &mut buffer);
        if !apply(&mut outcome, name, result, progress) {
            break;
        }
    }

    outcome
}

/// Folds one member result into `outcome`; returns `false` on failure.
fn apply(
    outcome: &mut BatchOutcome,
    name: &str,
    result: Result<u64>,
    progress: &mut dyn ProgressCallback,
) -> bool {
    match result {
        Ok(bytes) => {
            debug!(member = name, bytes, "extracted member");
            outcome.bytes_written = outcome.bytes_written.saturating_add(bytes);
            outcome.extracted.push(name.to_string());
            progress.on_member_extracted(name, bytes);
            true
        }
        Err(error) => {
            warn!(batch = outcome.batch_index, member = name, %error, "batch extraction failed");
            outcome.failure = Some(BatchFailure::from_error(outcome.batch_index, &error));
            false
        }
    }
}

/// Writes one member below `target`, returning the number of bytes written.
fn extract_member<A: ArchiveReader + ?Sized>(
    archive: &mut A,
    index: usize,
    name: &str,
    target: &Path,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let failure = |reason: String| IngestError::ExtractionFailure {
        member: name.to_string(),
        reason,
    };

    let member = MemberPath::parse(name)?;
    let output_path = member.resolve(target)?;

    if member.is_dir() {
        create_dir_all(&output_path).map_err(|e| failure(e.to_string()))?;
        return Ok(0);
    }

    if let Some(parent) = output_path.parent() {
        create_dir_all(parent).map_err(|e| failure(e.to_string()))?;
    }

    let mut reader = archive.open_member(index)?;

    // Written next to the destination and renamed into place, so a reader of
    // the destination sees either the previous file or the complete new one.
    let partial_path = partial_path_for(&output_path);
    let output_file = File::create(&partial_path).map_err(|e| failure(e.to_string()))?;
    let mut writer = BufWriter::with_capacity(64 * 1024, output_file);

    let copied = copy_with_buffer(&mut reader, &mut writer, buffer).and_then(|bytes| {
        writer.flush()?;
        Ok(bytes)
    });
    drop(writer);

    let installed = copied.and_then(|bytes| {
        fs::rename(&partial_path, &output_path)?;
        Ok(bytes)
    });

    installed.map_err(|e| {
        let _ = fs::remove_file(&partial_path);
        failure(e.to_string())
    })
}

/// Sibling path a member is streamed to before it replaces `output_path`.
fn partial_path_for(output_path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(output_path.file_name().unwrap_or_default());
    name.push(PARTIAL_SUFFIX);
    output_path.with_file_name(name)
}
