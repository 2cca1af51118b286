//! Shared helpers for statix-core integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use statix_core::ContentAddress;
use statix_core::ContentRecord;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Builds a ZIP archive with stored (uncompressed) members.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

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

/// Writes a ZIP archive to `path`.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    std::fs::write(path, build_zip(entries)).expect("failed to write archive");
}

/// Member list of a small site with `count` pages plus an entry point.
pub fn site_entries(count: usize) -> Vec<(String, String)> {
    let mut entries = vec![("site/index.html".to_string(), "<h1>home</h1>".to_string())];
    for i in 1..count {
        entries.push((format!("site/pages/p{i:02}.html"), format!("<p>{i}</p>")));
    }
    entries
}

/// Borrows owned entries as the `(&str, &str)` pairs the builders take.
pub fn as_pairs(entries: &[(String, String)]) -> Vec<(&str, &str)> {
    entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_str()))
        .collect()
}

/// Flips the case of the first occurrence of `payload` in stored archive
/// bytes, so the member still parses but fails its CRC check.
pub fn corrupt_payload(archive: &mut [u8], payload: &str) {
    let needle = payload.as_bytes();
    let start = archive
        .windows(needle.len())
        .position(|window| window == needle)
        .expect("payload not found in archive");
    for byte in &mut archive[start..start + needle.len()] {
        *byte = byte.to_ascii_lowercase();
    }
}

/// Minimal record for driving the pipeline.
#[derive(Debug, Default, Clone)]
pub struct TestRecord {
    pub id: String,
    pub address: Option<ContentAddress>,
    pub url: Option<String>,
    pub saves: usize,
}

impl TestRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

impl ContentRecord for TestRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn stored_address(&self) -> Option<ContentAddress> {
        self.address.clone()
    }

    fn set_address_and_url(&mut self, address: &ContentAddress, url: &str) -> statix_core::Result<()> {
        self.address = Some(address.clone());
        self.url = Some(url.to_string());
        Ok(())
    }

    fn save(&mut self) -> statix_core::Result<()> {
        self.saves += 1;
        Ok(())
    }
}
