//! Validated archive member path.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::IngestError;
use crate::Result;

/// An archive member name that is safe to join onto a target directory.
///
/// `MemberPath` rejects:
/// - Empty names
/// - Null bytes
/// - Absolute paths and drive prefixes
/// - Parent directory components (`..`)
///
/// `.` components are dropped. Names ending in `/` are directory entries.
///
/// # Examples
///
/// ```
/// use statix_core::types::MemberPath;
/// use std::path::Path;
///
/// # fn main() -> statix_core::Result<()> {
/// let member = MemberPath::parse("./css/site.css")?;
/// assert_eq!(member.as_path(), Path::new("css/site.css"));
/// assert!(!member.is_dir());
///
/// assert!(MemberPath::parse("../etc/passwd").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberPath {
    relative: PathBuf,
    is_dir: bool,
}

impl MemberPath {
    /// Validates an archive member name.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailure` naming the member if it could escape the
    /// target directory or does not name anything.
    pub fn parse(name: &str) -> Result<Self> {
        let reject = |reason: &str| IngestError::ExtractionFailure {
            member: name.to_string(),
            reason: reason.to_string(),
        };

        if name.contains('\0') {
            return Err(reject("member name contains null bytes"));
        }

        let mut relative = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(reject("member name escapes the target directory"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(reject("absolute member names are not allowed"));
                }
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(reject("member name is empty"));
        }

        Ok(Self {
            relative,
            is_dir: name.ends_with('/'),
        })
    }

    /// Returns the normalized relative path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.relative
    }

    /// Returns `true` for directory entries.
    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Joins the member onto `target`.
    ///
    /// When the parent directory already exists it is canonicalized and must
    /// still lie inside `target`, so a symlink planted by an earlier member
    /// cannot redirect a write.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailure` if the resolved parent escapes `target`,
    /// or `Io` if canonicalization fails for a reason other than absence.
    pub fn resolve(&self, target: &Path) -> Result<PathBuf> {
        let resolved = target.join(&self.relative);
        let Some(parent) = resolved.parent() else {
            return Ok(resolved);
        };

        match (parent.canonicalize(), target.canonicalize()) {
            (Ok(parent), Ok(target)) if !parent.starts_with(&target) => {
                Err(IngestError::ExtractionFailure {
                    member: self.relative.display().to_string(),
                    reason: "member resolves outside the target directory".to_string(),
                })
            }
            (Err(e), _) | (_, Err(e)) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(IngestError::Io(e))
            }
            _ => Ok(resolved),
        }
    }
}
