//! ZIP archive reader.

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use crate::IngestError;
use crate::Result;

use super::traits::ArchiveReader;

/// ZIP archive opened for listing and selective extraction.
pub struct ZipReader<R: Read + Seek = File> {
    source: PathBuf,
    archive: zip::ZipArchive<R>,
    members: Vec<String>,
}

impl ZipReader<File> {
    /// Opens a ZIP file and reads its member listing.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableArchive` if the file cannot be opened or its
    /// central directory cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use statix_core::ZipReader;
    /// use statix_core::formats::ArchiveReader;
    ///
    /// # fn main() -> statix_core::Result<()> {
    /// let reader = ZipReader::open("site.zip")?;
    /// for member in reader.members() {
    ///     println!("{member}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| IngestError::UnreadableArchive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::new(file, path)
    }
}

impl<R: Read + Seek> ZipReader<R> {
    /// Reads the member listing from any seekable reader.
    ///
    /// `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `UnreadableArchive` if the data is not a readable ZIP archive.
    pub fn new(reader: R, source: &Path) -> Result<Self> {
        let unreadable = |e: zip::result::ZipError| IngestError::UnreadableArchive {
            path: source.to_path_buf(),
            reason: e.to_string(),
        };

        let mut archive = zip::ZipArchive::new(reader).map_err(unreadable)?;

        // Raw access only parses headers, so entries with unsupported
        // compression still list and fail later inside their own batch.
        let mut members = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index).map_err(unreadable)?;
            members.push(entry.name().to_string());
        }

        Ok(Self {
            source: source.to_path_buf(),
            archive,
            members,
        })
    }

    /// Returns the path the archive was read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl<R: Read + Seek> ArchiveReader for ZipReader<R> {
    fn members(&self) -> &[String] {
        &self.members
    }

    fn open_member(&mut self, index: usize) -> Result<Box<dyn Read + '_>> {
        let Some(name) = self.members.get(index) else {
            return Err(IngestError::ExtractionFailure {
                member: format!("#{index}"),
                reason: format!("archive has only {} members", self.members.len()),
            });
        };

        let entry = self
            .archive
            .by_index(index)
            .map_err(|e| IngestError::ExtractionFailure {
                member: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Box::new(entry))
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}

impl<R: Read + Seek> std::fmt::Debug for ZipReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipReader")
            .field("source", &self.source)
            .field("members", &self.members.len())
            .finish_non_exhaustive()
    }
}
