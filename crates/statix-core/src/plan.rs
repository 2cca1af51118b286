//! Extraction planning.
//!
//! A plan splits an archive's member list into consecutive, bounded-size
//! batches and locates the entry-point document. Plans are immutable and
//! serializable so a job runner can persist them next to the progress state.

use serde::Deserialize;
use serde::Serialize;

use crate::ContentAddress;
use crate::IngestConfig;
use crate::Result;
use crate::config::validate_batch_size;
use crate::config::validate_sentinel;

/// An ordered, non-empty slice of the member list extracted as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionBatch {
    /// Zero-based position of this batch in its plan.
    pub index: usize,
    /// Position of the first member of this batch in the archive listing.
    pub start: usize,
    /// Member names, in archive order.
    pub members: Vec<String>,
}

impl ExtractionBatch {
    /// Returns the number of members in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the batch has no members.
    ///
    /// Batches produced by a plan are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates `(archive index, member name)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.members
            .iter()
            .enumerate()
            .map(move |(offset, name)| (self.start + offset, name.as_str()))
    }
}

/// Ordered batch decomposition of one archive plus its entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPlan {
    address: ContentAddress,
    batches: Vec<ExtractionBatch>,
    entry_point: String,
    member_count: usize,
}

impl ExtractionPlan {
    /// Builds a plan for `members`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `batch_size` is zero or the sentinel
    /// is not a plain file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use statix_core::ContentAddress;
    /// use statix_core::ExtractionPlan;
    ///
    /// # fn main() -> statix_core::Result<()> {
    /// let members = ["a/b.css", "a/index.html", "c/index.html"];
    /// let address = ContentAddress::compute("1", &members);
    /// let plan = ExtractionPlan::new(address, &members, 2, "index.html")?;
    ///
    /// assert_eq!(plan.total_batches(), 2);
    /// assert_eq!(plan.entry_point(), "a/index.html");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<S: AsRef<str>>(
        address: ContentAddress,
        members: &[S],
        batch_size: usize,
        entry_sentinel: &str,
    ) -> Result<Self> {
        validate_batch_size(batch_size)?;
        validate_sentinel(entry_sentinel)?;

        let batches = members
            .chunks(batch_size)
            .enumerate()
            .map(|(index, chunk)| ExtractionBatch {
                index,
                start: index * batch_size,
                members: chunk.iter().map(|m| m.as_ref().to_string()).collect(),
            })
            .collect();

        let entry_point = find_entry_point(members, entry_sentinel)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            address,
            batches,
            entry_point,
            member_count: members.len(),
        })
    }

    /// Builds a plan using the batch size and sentinel from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` does not validate.
    pub fn with_config<S: AsRef<str>>(
        address: ContentAddress,
        members: &[S],
        config: &IngestConfig,
    ) -> Result<Self> {
        Self::new(address, members, config.batch_size, &config.entry_sentinel)
    }

    /// Returns the content address the plan extracts into.
    #[must_use]
    pub fn address(&self) -> &ContentAddress {
        &self.address
    }

    /// Returns the batches in execution order.
    #[must_use]
    pub fn batches(&self) -> &[ExtractionBatch] {
        &self.batches
    }

    /// Returns the batch at `index`, if any.
    #[must_use]
    pub fn batch(&self, index: usize) -> Option<&ExtractionBatch> {
        self.batches.get(index)
    }

    /// Returns the entry-point member, or `""` when the archive has none.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Returns the number of batches.
    #[must_use]
    pub fn total_batches(&self) -> usize {
        self.batches.len()
    }

    /// Returns the number of members across all batches.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.member_count
    }

    /// Returns `true` when the whole archive fits in a single batch.
    #[must_use]
    pub fn is_single_batch(&self) -> bool {
        self.batches.len() == 1
    }

    /// Returns the URL of the entry point relative to the content root.
    ///
    /// Without an entry point this is the directory URL (`<address>/`).
    #[must_use]
    pub fn entry_url(&self) -> String {
        format!("{}/{}", self.address, self.entry_point)
    }
}

/// Finds the first member whose final path component equals `sentinel`.
pub fn find_entry_point<'a, S: AsRef<str>>(members: &'a [S], sentinel: &str) -> Option<&'a str> {
    members
        .iter()
        .map(AsRef::as_ref)
        .find(|member| member.rsplit('/').next() == Some(sentinel))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::IngestError;

    fn address() -> ContentAddress {
        ContentAddress::compute("test", &["x"])
    }

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("file{i:02}.txt")).collect()
    }

    #[test]
    fn test_twenty_three_members_in_batches_of_ten() {
        let members = names(23);
        let plan = ExtractionPlan::new(address(), &members, 10, "index.html").unwrap();

        let sizes: Vec<usize> = plan.batches().iter().map(ExtractionBatch::len).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(plan.total_batches(), 3);
        assert_eq!(plan.member_count(), 23);
        assert_eq!(plan.batch(2).unwrap().start, 20);
    }

    #[test]
    fn test_entry_point_is_first_match() {
        let members = ["a/b.css", "a/index.html", "c/index.html"];
        let plan = ExtractionPlan::new(address(), &members, 10, "index.html").unwrap();
        assert_eq!(plan.entry_point(), "a/index.html");
    }

    #[test]
    fn test_entry_point_matches_whole_component() {
        let members = ["old_index.html", "index.html.bak", "index.html/", "site/index.html"];
        assert_eq!(
            find_entry_point(&members, "index.html"),
            Some("site/index.html")
        );
    }

    #[test]
    fn test_missing_entry_point_is_empty() {
        let members = ["style.css"];
        let plan = ExtractionPlan::new(address(), &members, 10, "index.html").unwrap();
        assert_eq!(plan.entry_point(), "");
        assert!(plan.entry_url().ends_with('/'));
    }

    #[test]
    fn test_empty_member_list() {
        let plan = ExtractionPlan::new::<&str>(address(), &[], 10, "index.html").unwrap();
        assert_eq!(plan.total_batches(), 0);
        assert_eq!(plan.entry_point(), "");
        assert!(!plan.is_single_batch());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = ExtractionPlan::new(address(), &names(3), 0, "index.html");
        assert!(matches!(
            result,
            Err(IngestError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_malformed_sentinel_rejected() {
        let result = ExtractionPlan::new(address(), &names(3), 2, "a/index.html");
        assert!(matches!(
            result,
            Err(IngestError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_batch_entries_carry_archive_indices() {
        let members = names(5);
        let plan = ExtractionPlan::new(address(), &members, 2, "index.html").unwrap();
        let last: Vec<(usize, &str)> = plan.batch(2).unwrap().entries().collect();
        assert_eq!(last, vec![(4, "file04.txt")]);
    }

    #[test]
    fn test_single_batch_detection() {
        let plan = ExtractionPlan::new(address(), &names(10), 10, "index.html").unwrap();
        assert!(plan.is_single_batch());
        let plan = ExtractionPlan::new(address(), &names(11), 10, "index.html").unwrap();
        assert!(!plan.is_single_batch());
    }
}
