//! The host record that owns a piece of static content.

use crate::ContentAddress;
use crate::Result;

/// A host-side record whose content is stored under a content address.
///
/// The pipeline reads the record's identifier and current address, and
/// writes the new address and entry URL exactly once, when an ingestion
/// finalizes successfully.
pub trait ContentRecord {
    /// Stable identifier of the record, mixed into the content address.
    fn id(&self) -> &str;

    /// Address of the content currently served for this record, if any.
    fn stored_address(&self) -> Option<ContentAddress>;

    /// Points the record at new content.
    ///
    /// # Errors
    ///
    /// Returns `Record` if the host rejects the update.
    fn set_address_and_url(&mut self, address: &ContentAddress, url: &str) -> Result<()>;

    /// Persists the record.
    ///
    /// # Errors
    ///
    /// Returns `Record` or `Io` if the record cannot be stored.
    fn save(&mut self) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory record used by the pipeline tests.
    #[derive(Debug, Default)]
    pub struct MemoryRecord {
        pub id: String,
        pub address: Option<ContentAddress>,
        pub url: Option<String>,
        pub saves: usize,
    }

    impl MemoryRecord {
        pub fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                ..Self::default()
            }
        }
    }

    impl ContentRecord for MemoryRecord {
        fn id(&self) -> &str {
            &self.id
        }

        fn stored_address(&self) -> Option<ContentAddress> {
            self.address.clone()
        }

        fn set_address_and_url(&mut self, address: &ContentAddress, url: &str) -> Result<()> {
            self.address = Some(address.clone());
            self.url = Some(url.to_string());
            Ok(())
        }

        fn save(&mut self) -> Result<()> {
            self.saves += 1;
            Ok(())
        }
    }

    #[test]
    fn test_memory_record_updates() {
        let mut record = MemoryRecord::new("5");
        let address = ContentAddress::compute("5", &["index.html"]);
        assert_eq!(record.stored_address(), None);

        record
            .set_address_and_url(&address, &format!("{address}/index.html"))
            .ok();
        record.save().ok();

        assert_eq!(record.stored_address(), Some(address));
        assert_eq!(record.saves, 1);
    }
}
