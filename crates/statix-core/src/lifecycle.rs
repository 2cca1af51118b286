//! Storage directories: creation and retirement.
//!
//! Every extraction lives in `<root>/static/<address>`. The store hands out
//! those directories and deletes them again once they are superseded, and
//! it refuses to delete anything that is not strictly below the static root.

use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use walkdir::WalkDir;

use crate::ContentAddress;
use crate::IngestError;
use crate::Result;

/// Name of the directory below the storage root that holds extracted content.
pub const STATIC_DIR: &str = "static";

const WRITE_CHECK: &str = ".statix-write-check";

/// Storage root that owns all extracted content directories.
///
/// # Examples
///
/// ```no_run
/// use statix_core::ContentAddress;
/// use statix_core::ContentStore;
///
/// # fn main() -> statix_core::Result<()> {
/// let store = ContentStore::new("/srv/files");
/// let address = ContentAddress::compute("7", &["index.html"]);
///
/// let dir = store.prepare_directory(&address)?;
/// assert!(dir.ends_with(address.as_str()));
///
/// store.retire(&dir)?;
/// store.retire(&dir)?; // already gone, still fine
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    static_root: PathBuf,
}

impl ContentStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = normalize(root.as_ref());
        let static_root = root.join(STATIC_DIR);
        Self { root, static_root }
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `<root>/static`.
    #[must_use]
    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    /// Returns the directory that holds content with `address`.
    #[must_use]
    pub fn path_for(&self, address: &ContentAddress) -> PathBuf {
        self.static_root.join(address.as_str())
    }

    /// Ensures the directory for `address` exists and returns its path.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the directory cannot be created or is
    /// not writable, for example because of permissions or a file occupying
    /// the path.
    pub fn prepare_directory(&self, address: &ContentAddress) -> Result<PathBuf> {
        let path = self.path_for(address);
        let unavailable = |source| IngestError::StorageUnavailable {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&path).map_err(unavailable)?;
        ensure_writable(&path).map_err(unavailable)?;
        debug!(path = %path.display(), "storage directory ready");
        Ok(path)
    }

    /// Recursively deletes `path`, hidden files included.
    ///
    /// Symlinks inside the tree are removed, never followed. A path that
    /// does not exist is treated as already retired.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` unless `path` lies strictly below the static
    /// root, and `Io` if deletion fails part-way.
    pub fn retire(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        self.check_contained(&path)?;

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                debug!(path = %path.display(), "nothing to retire");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.check_canonical(&path)?;

        if metadata.is_dir() {
            remove_tree(&path)?;
        } else {
            fs::remove_file(&path)?;
        }

        info!(path = %path.display(), "retired content directory");
        Ok(())
    }

    /// Retires the directory of `address`.
    ///
    /// # Errors
    ///
    /// See [`retire`](Self::retire).
    pub fn retire_address(&self, address: &ContentAddress) -> Result<()> {
        self.retire(&self.path_for(address))
    }

    /// Lexical containment: no `..`, and strictly below the static root.
    fn check_contained(&self, path: &Path) -> Result<()> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir));

        if escapes || path == self.static_root || !path.starts_with(&self.static_root) {
            return Err(IngestError::InvalidPath {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Containment after resolving symlinks in the parent chain.
    fn check_canonical(&self, path: &Path) -> Result<()> {
        let invalid = || IngestError::InvalidPath {
            path: path.to_path_buf(),
        };

        let static_root = self.static_root.canonicalize()?;
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return Err(invalid());
        };
        let resolved = parent.canonicalize()?.join(name);

        if resolved == static_root || !resolved.starts_with(&static_root) {
            return Err(invalid());
        }
        Ok(())
    }
}

/// Fails unless files can be created in `dir`.
fn ensure_writable(dir: &Path) -> io::Result<()> {
    if fs::metadata(dir)?.permissions().readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "directory is read-only",
        ));
    }

    let check = dir.join(WRITE_CHECK);
    fs::File::create(&check)?;
    fs::remove_file(&check)
}

/// Depth-first removal: children before their directory.
fn remove_tree(path: &Path) -> io::Result<()> {
    for entry in WalkDir::new(path).follow_links(false).contents_first(true) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Drops `.` components and trailing separators.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn address(tag: &str) -> ContentAddress {
        ContentAddress::compute(tag, &["index.html"])
    }

    fn populate(dir: &Path) {
        fs::create_dir_all(dir.join("css/.cache")).unwrap();
        fs::write(dir.join("index.html"), "<html>").unwrap();
        fs::write(dir.join(".htaccess"), "deny").unwrap();
        fs::write(dir.join("css/.cache/x"), "x").unwrap();
    }

    #[test]
    fn test_prepare_creates_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());

        let dir = store.prepare_directory(&address("1")).unwrap();

        assert!(dir.is_dir());
        assert_eq!(dir, temp.path().join("static").join(address("1").as_str()));
        // Preparing twice is fine.
        assert_eq!(store.prepare_directory(&address("1")).unwrap(), dir);
    }

    #[test]
    fn test_prepare_over_file_is_storage_unavailable() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::write(temp.path().join("static"), "not a directory").unwrap();
        let store = ContentStore::new(temp.path());

        let result = store.prepare_directory(&address("1"));

        assert!(matches!(
            result,
            Err(IngestError::StorageUnavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_read_only_directory_is_storage_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        let dir = store.prepare_directory(&address("1")).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        let result = store.prepare_directory(&address("1"));
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(
            result,
            Err(IngestError::StorageUnavailable { .. })
        ));
        assert!(!dir.join(WRITE_CHECK).exists());
    }

    #[test]
    fn test_retire_removes_tree_with_dotfiles() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        let dir = store.prepare_directory(&address("1")).unwrap();
        populate(&dir);

        store.retire(&dir).unwrap();

        assert!(!dir.exists());
        assert!(store.static_root().is_dir());
    }

    #[test]
    fn test_retire_is_idempotent() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        let dir = store.prepare_directory(&address("1")).unwrap();
        populate(&dir);

        store.retire(&dir).unwrap();
        store.retire(&dir).unwrap();
        store.retire_address(&address("never-created")).unwrap();
    }

    #[test]
    fn test_retire_below_a_file_is_noop() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        fs::create_dir_all(store.static_root()).unwrap();
        fs::write(store.static_root().join("stray"), "x").unwrap();

        store.retire(&store.static_root().join("stray/sub")).unwrap();

        assert!(store.static_root().join("stray").is_file());
    }

    #[test]
    fn test_retire_leaves_siblings_alone() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        let old = store.prepare_directory(&address("old")).unwrap();
        let current = store.prepare_directory(&address("new")).unwrap();
        populate(&old);
        populate(&current);

        store.retire_address(&address("old")).unwrap();

        assert!(!old.exists());
        assert!(current.join("index.html").is_file());
    }

    #[test]
    fn test_retire_outside_root_rejected() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path().join("files"));
        let outside = temp.path().join("elsewhere");
        fs::create_dir_all(&outside).unwrap();

        let result = store.retire(&outside);

        assert!(matches!(result, Err(IngestError::InvalidPath { .. })));
        assert!(outside.exists());
    }

    #[test]
    fn test_retire_static_root_rejected() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        store.prepare_directory(&address("1")).unwrap();

        for path in [
            store.static_root().to_path_buf(),
            temp.path().join("static/"),
            temp.path().join("static/."),
        ] {
            assert!(matches!(
                store.retire(&path),
                Err(IngestError::InvalidPath { .. })
            ));
        }
        assert!(store.static_root().is_dir());
    }

    #[test]
    fn test_retire_parent_components_rejected() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path());
        store.prepare_directory(&address("1")).unwrap();

        let sneaky = temp.path().join("static").join("..").join("records");
        assert!(matches!(
            store.retire(&sneaky),
            Err(IngestError::InvalidPath { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_retire_does_not_follow_symlinks() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path().join("files"));
        let dir = store.prepare_directory(&address("1")).unwrap();

        let precious = temp.path().join("precious");
        fs::create_dir_all(&precious).unwrap();
        fs::write(precious.join("keep.txt"), "keep").unwrap();
        std::os::unix::fs::symlink(&precious, dir.join("link")).unwrap();

        store.retire(&dir).unwrap();

        assert!(!dir.exists());
        assert!(precious.join("keep.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_retire_through_symlinked_parent_rejected() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let store = ContentStore::new(temp.path().join("files"));
        store.prepare_directory(&address("1")).unwrap();

        let outside = temp.path().join("outside");
        fs::create_dir_all(outside.join("victim")).unwrap();
        std::os::unix::fs::symlink(&outside, store.static_root().join("escape")).unwrap();

        let result = store.retire(&store.static_root().join("escape/victim"));

        assert!(matches!(result, Err(IngestError::InvalidPath { .. })));
        assert!(outside.join("victim").is_dir());
    }
}
