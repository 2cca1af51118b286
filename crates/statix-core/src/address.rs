//! Content addresses for extracted archives.
//!
//! A content address names the storage directory of one extraction. It is a
//! SHA-256 digest over the owning record's identifier and the archive's
//! ordered member list, so re-uploading the same archive for the same record
//! maps onto the same directory while any change in membership, ordering or
//! ownership moves the content somewhere new.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

/// Length of a content address in hex characters.
pub const ADDRESS_LEN: usize = 64;

/// Deterministic, filesystem-safe identifier of extracted content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Computes the address of an archive owned by `record_id`.
    ///
    /// Every field is length-prefixed before hashing, so no choice of member
    /// names can make two different lists produce the same byte stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use statix_core::ContentAddress;
    ///
    /// let members = ["index.html", "css/site.css"];
    /// let a = ContentAddress::compute("42", &members);
    /// let b = ContentAddress::compute("42", &members);
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str().len(), 64);
    /// assert_ne!(a, ContentAddress::compute("43", &members));
    /// ```
    pub fn compute<S: AsRef<str>>(record_id: &str, members: &[S]) -> Self {
        let mut hasher = Sha256::new();
        update_prefixed(&mut hasher, record_id.as_bytes());
        hasher.update((members.len() as u64).to_le_bytes());
        for member in members {
            update_prefixed(&mut hasher, member.as_ref().as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Parses a previously computed address.
    ///
    /// Returns `None` unless `value` is exactly 64 lowercase hex characters.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == ADDRESS_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(value.to_string()))
    }

    /// Returns the address as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn update_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentAddress {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid content address: {value}"))
    }
}

impl From<ContentAddress> for String {
    fn from(address: ContentAddress) -> Self {
        address.0
    }
}
