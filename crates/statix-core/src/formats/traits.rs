//! Common trait for archive readers.

use std::io::Read;

use crate::Result;

/// Read-only access to an archive: a flat member listing plus the ability
/// to stream any listed member.
///
/// Members are addressed by their position in [`members`](Self::members), so
/// archives containing the same name twice extract faithfully.
pub trait ArchiveReader {
    /// Returns the member names in archive order, duplicates included.
    fn members(&self) -> &[String];

    /// Opens the member at `index` for reading.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailure` if the member cannot be located or opened.
    fn open_member(&mut self, index: usize) -> Result<Box<dyn Read + '_>>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryArchive;

    #[test]
    fn test_trait_object_usage() {
        let mut archive = MemoryArchive::new(&[("a.txt", "alpha")]);
        let reader: &mut dyn ArchiveReader = &mut archive;

        assert_eq!(reader.format_name(), "memory");
        assert_eq!(reader.members(), ["a.txt".to_string()]);

        let mut content = String::new();
        let mut member = reader.open_member(0).unwrap();
        member.read_to_string(&mut content).unwrap();
        assert_eq!(content, "alpha");
    }
}
