//! File-backed static content records and pending jobs.
//!
//! Records live in `<root>/records/<id>.json` and pending step-wise
//! ingestions in `<root>/jobs/<id>.json`.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use serde::Deserialize;
use serde::Serialize;
use statix_core::ContentAddress;
use statix_core::ContentRecord;
use statix_core::IngestError;
use statix_core::IngestionJob;
use statix_core::lifecycle::STATIC_DIR;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

const RECORDS_DIR: &str = "records";
const JOBS_DIR: &str = "jobs";

/// A titled piece of static content served from an extracted archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticContent {
    pub id: String,
    pub name: String,
    /// `static/<address>` below the storage root, once content is ingested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    /// Entry URL relative to the static root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created: u64,
    pub changed: u64,
    #[serde(skip)]
    path: PathBuf,
}

impl StaticContent {
    /// Returns where the record is stored.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentRecord for StaticContent {
    fn id(&self) -> &str {
        &self.id
    }

    fn stored_address(&self) -> Option<ContentAddress> {
        self.base_uri
            .as_deref()
            .and_then(|uri| uri.strip_prefix(STATIC_DIR))
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(ContentAddress::parse)
    }

    fn set_address_and_url(
        &mut self,
        address: &ContentAddress,
        url: &str,
    ) -> statix_core::Result<()> {
        self.base_uri = Some(format!("{STATIC_DIR}/{address}"));
        self.url = Some(url.to_string());
        Ok(())
    }

    fn save(&mut self) -> statix_core::Result<()> {
        self.changed = now();
        let json =
            serde_json::to_vec_pretty(self).map_err(|e| IngestError::Record(e.to_string()))?;
        write_replacing(&self.path, &json)?;
        Ok(())
    }
}

/// Record and job files below one storage root.
pub struct RecordStore {
    records: PathBuf,
    jobs: PathBuf,
}

impl RecordStore {
    pub fn new(root: &Path) -> Self {
        Self {
            records: root.join(RECORDS_DIR),
            jobs: root.join(JOBS_DIR),
        }
    }

    /// Loads record `id`, if it exists.
    pub fn load(&self, id: &str) -> Result<Option<StaticContent>> {
        let path = self.record_path(id)?;
        let Some(bytes) = read_optional(&path)? else {
            return Ok(None);
        };
        let mut record: StaticContent = serde_json::from_slice(&bytes)
            .with_context(|| format!("corrupt record file '{}'", path.display()))?;
        record.path = path;
        Ok(Some(record))
    }

    /// Loads record `id`, or prepares a new unsaved one named `name`.
    pub fn load_or_new(&self, id: &str, name: &str) -> Result<StaticContent> {
        if let Some(record) = self.load(id)? {
            return Ok(record);
        }
        let created = now();
        Ok(StaticContent {
            id: id.to_string(),
            name: name.to_string(),
            base_uri: None,
            url: None,
            created,
            changed: created,
            path: self.record_path(id)?,
        })
    }

    /// Deletes the file of `record`.
    pub fn remove(&self, record: &StaticContent) -> Result<()> {
        remove_optional(&record.path)
    }

    /// Loads the pending job of record `id`, if any.
    pub fn load_job(&self, id: &str) -> Result<Option<IngestionJob>> {
        let path = self.job_path(id)?;
        let Some(bytes) = read_optional(&path)? else {
            return Ok(None);
        };
        let job = serde_json::from_slice(&bytes)
            .with_context(|| format!("corrupt job file '{}'", path.display()))?;
        Ok(Some(job))
    }

    /// Persists the pending job of its record.
    pub fn save_job(&self, job: &IngestionJob) -> Result<()> {
        let path = self.job_path(job.record_id())?;
        let json = serde_json::to_vec_pretty(job)?;
        write_replacing(&path, &json)
            .with_context(|| format!("failed to save job '{}'", path.display()))
    }

    /// Removes the pending job of record `id`.
    pub fn remove_job(&self, id: &str) -> Result<()> {
        remove_optional(&self.job_path(id)?)
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.records.join(format!("{id}.json")))
    }

    fn job_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.jobs.join(format!("{id}.json")))
    }
}

/// Record identifiers become file names, so they are kept to a safe alphabet.
pub fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id.len() <= 128
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        bail!(
            "invalid record id '{}'\n\
             HINT: Record ids may only contain letters, digits, '-' and '_'.",
            id.escape_debug()
        );
    }
    Ok(())
}

/// Writes via a sibling temp file and rename so readers never see half a file.
fn write_replacing(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read '{}'", path.display())),
    }
}

fn remove_optional(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove '{}'", path.display())),
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
