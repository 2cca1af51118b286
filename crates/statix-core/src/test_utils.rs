//! Test helpers for building archives in memory.
//!
//! # Panics
//!
//! Helpers panic on I/O errors; they are only compiled for tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashSet;
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;

use crate::IngestError;
use crate::Result;
use crate::formats::ArchiveReader;

/// Creates an in-memory ZIP archive from `(name, content)` pairs.
///
/// Names ending in `/` become directory entries. Files are stored
/// uncompressed so tests can locate and corrupt their bytes.
#[must_use]
pub fn create_test_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for &(name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(name, options).unwrap();
        } else {
            zip.start_file(name, options).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

/// In-memory archive whose selected members fail halfway through reading.
pub struct MemoryArchive {
    names: Vec<String>,
    contents: Vec<Vec<u8>>,
    failing: HashSet<usize>,
}

impl MemoryArchive {
    /// Creates an archive from `(name, content)` pairs.
    #[must_use]
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let (names, contents) = entries
            .iter()
            .map(|&(name, data)| (name.to_string(), data.as_bytes().to_vec()))
            .unzip();
        Self {
            names,
            contents,
            failing: HashSet::new(),
        }
    }

    /// Creates an archive of `count` small HTML files named `page{i}.html`.
    #[must_use]
    pub fn with_pages(count: usize) -> Self {
        let names: Vec<String> = (0..count).map(|i| format!("page{i:02}.html")).collect();
        let contents = (0..count).map(|i| format!("<p>{i}</p>").into_bytes()).collect();
        Self {
            names,
            contents,
            failing: HashSet::new(),
        }
    }

    /// Makes the member at `index` fail with a read error.
    #[must_use]
    pub fn fail_member(mut self, index: usize) -> Self {
        self.failing.insert(index);
        self
    }
}

impl ArchiveReader for MemoryArchive {
    fn members(&self) -> &[String] {
        &self.names
    }

    fn open_member(&mut self, index: usize) -> Result<Box<dyn Read + '_>> {
        let data = self
            .contents
            .get(index)
            .ok_or_else(|| IngestError::ExtractionFailure {
                member: format!("#{index}"),
                reason: "no such member".to_string(),
            })?;

        if self.failing.contains(&index) {
            let half = data.len() / 2;
            return Ok(Box::new(Cursor::new(&data[..half]).chain(BrokenReader)));
        }
        Ok(Box::new(Cursor::new(data.as_slice())))
    }

    fn format_name(&self) -> &str {
        "memory"
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::InvalidData, "invalid checksum"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_zip() {
        let zip_data = create_test_zip(&[("dir/", ""), ("dir/file.txt", "hello")]);
        assert!(!zip_data.is_empty());
    }

    #[test]
    fn test_failing_member_errors() {
        let mut archive = MemoryArchive::with_pages(2).fail_member(1);
        let mut sink = Vec::new();
        assert!(archive.open_member(0).unwrap().read_to_end(&mut sink).is_ok());
        assert!(archive.open_member(1).unwrap().read_to_end(&mut sink).is_err());
    }
}
