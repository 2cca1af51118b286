//! Error types for archive ingestion operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `IngestError`.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while planning, extracting, or retiring content.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Batch size or entry sentinel is unusable, or the job API was misused.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the rejected setting.
        reason: String,
    },

    /// Archive container could not be opened or listed.
    #[error("unreadable archive {path}: {reason}")]
    UnreadableArchive {
        /// Path of the archive file.
        path: PathBuf,
        /// Reason reported by the archive reader.
        reason: String,
    },

    /// Target storage directory could not be prepared.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A member of an extraction batch could not be read or written.
    #[error("failed to extract '{member}': {reason}")]
    ExtractionFailure {
        /// Archive member name that failed.
        member: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Retirement target lies outside the managed static-content root.
    #[error("refusing to touch path outside the static content root: {path}")]
    InvalidPath {
        /// The rejected path.
        path: PathBuf,
    },

    /// The record collaborator failed to store the new address.
    #[error("record error: {0}")]
    Record(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Creates an `InvalidConfiguration` error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error aborts an ingestion attempt.
    ///
    /// Only `ExtractionFailure` is batch-scoped: it is recorded against its
    /// batch and extraction carries on with the next one.
    ///
    /// # Examples
    ///
    /// ```
    /// use statix_core::IngestError;
    ///
    /// let err = IngestError::ExtractionFailure {
    ///     member: "css/site.css".to_string(),
    ///     reason: "invalid checksum".to_string(),
    /// };
    /// assert!(!err.is_fatal());
    ///
    /// let err = IngestError::config("batch size must be at least 1");
    /// assert!(err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::ExtractionFailure { .. })
    }

    /// Returns the archive member associated with this error, if any.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        match self {
            Self::ExtractionFailure { member, .. } => Some(member),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::config("batch size must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration: batch size must be at least 1"
        );
    }

    #[test]
    fn test_invalid_path_error() {
        let err = IngestError::InvalidPath {
            path: PathBuf::from("/etc"),
        };
        assert!(err.to_string().contains("outside the static content root"));
        assert!(err.to_string().contains("/etc"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_extraction_failure_is_not_fatal() {
        let err = IngestError::ExtractionFailure {
            member: "a/b.html".to_string(),
            reason: "boom".to_string(),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.member(), Some("a/b.html"));
    }

    #[test]
    fn test_storage_unavailable_keeps_source() {
        use std::error::Error as _;

        let err = IngestError::StorageUnavailable {
            path: PathBuf::from("/static/abc"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.member(), None);
    }
}
