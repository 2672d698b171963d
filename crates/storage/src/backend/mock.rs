//! In-memory storage backend for testing.

use super::FileInfoStream;
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::{FileInfo, StorageBackend};
use async_stream::stream;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Where [`MockBackend::locate`](StorageBackend::locate) pretends files live.
const MOCK_ROOT: &str = "/mock";

/// Builds the error an import should fail with, given the relative target.
pub type ImportFailure = fn(&Path) -> ErrorKind;

/// In-memory storage backend for testing.
///
/// Archived files are kept in a `HashMap` behind a [`RwLock`]. Imports still
/// read and remove the real source file, so callers can assert on what
/// happened to it. [`failing_imports`](Self::failing_imports) makes every
/// import fail before the source is touched, which is how filesystem refusals
/// (another device, a target claimed mid-flight) are simulated.
///
/// ```
/// use docket_storage::backend::{MockBackend, StorageBackend};
/// use docket_storage::error::ErrorKind;
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_files([("texts/2021/a.txt", b"data")]);
/// assert!(backend.exists(Path::new("texts/2021")).await?);
///
/// let backend = MockBackend::default().failing_imports(|target| ErrorKind::CrossesDevices(target.into()));
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    directories: RwLock<HashSet<PathBuf>>,
    import_failure: Option<ImportFailure>,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files. Their parent
    /// directories exist too.
    ///
    /// Panics if any path fails validation.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        let mut directories = HashSet::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            if let Some(parent) = validated.parent() {
                insert_with_ancestors(&mut directories, parent);
            }
            map.insert(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            files: RwLock::new(map),
            directories: RwLock::new(directories),
            import_failure: None,
        }
    }

    /// Make every import fail with the given error, leaving the source alone.
    pub fn failing_imports(mut self, failure: ImportFailure) -> Self {
        self.import_failure = Some(failure);
        self
    }

    /// Contents of an archived file.
    pub async fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = validate_path(path.as_ref()).ok()?;
        self.files.read().await.get(&path).cloned()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

fn insert_with_ancestors(directories: &mut HashSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors().filter(|a| !a.as_os_str().is_empty()) {
        if !directories.insert(ancestor.to_path_buf()) {
            break;
        }
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        Ok(Path::new(MOCK_ROOT).join(validate_path(path)?))
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a> {
        let validated_prefix = match prefix.map(validate_path).transpose() {
            Ok(pfx) => pfx,
            Err(e) => return Box::pin(futures::stream::once(async { Err(e) })),
        };

        Box::pin(stream! {
            // Snapshot under the read lock; never hold it across a yield.
            let paths: Vec<PathBuf> = {
                let guard = self.files.read().await;
                guard
                    .keys()
                    .filter(|path| match &validated_prefix {
                        Some(pfx) => path.starts_with(pfx),
                        None => true,
                    })
                    .cloned()
                    .collect()
            };
            for path in paths {
                yield Ok(FileInfo::new(path));
            }
        })
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        Ok(self.files.read().await.contains_key(&path) || self.directories.read().await.contains(&path))
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        if self.files.read().await.keys().any(|file| path.starts_with(file)) {
            exn::bail!(ErrorKind::AlreadyExists(path));
        }
        insert_with_ancestors(&mut *self.directories.write().await, &path);
        Ok(())
    }

    async fn import(&self, source: &Path, target: &Path) -> Result<()> {
        if !source.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(source.to_path_buf()));
        }
        let target = validate_path(target)?;
        if let Some(failure) = self.import_failure {
            exn::bail!(failure(&target));
        }
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.directories.read().await.contains(parent) {
                exn::bail!(ErrorKind::NotFound(parent.to_path_buf()));
            }
        }

        let mut files = self.files.write().await;
        if files.contains_key(&target) {
            exn::bail!(ErrorKind::AlreadyExists(target));
        }
        let data = fs::read(source).await.map_err(ErrorKind::Io)?;
        fs::remove_file(source).await.map_err(ErrorKind::Io)?;
        files.insert(target, data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_files_creates_parents() {
        let backend = MockBackend::with_files([("texts/2021/a.txt", b"a")]);
        assert!(backend.exists(Path::new("texts")).await.unwrap());
        assert!(backend.exists(Path::new("texts/2021")).await.unwrap());
        assert!(backend.exists(Path::new("texts/2021/a.txt")).await.unwrap());
        assert!(!backend.exists(Path::new("images")).await.unwrap());
        assert_eq!(backend.locate(Path::new("texts/2021/a.txt")).unwrap(), Path::new("/mock/texts/2021/a.txt"));
    }

    #[tokio::test]
    async fn test_import_moves_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std::fs::write(&source, b"hello").unwrap();
        let backend = MockBackend::default();

        assert!(backend.import(&source, Path::new("texts/a.txt")).await.is_err());
        backend.create_dir(Path::new("texts")).await.unwrap();
        backend.import(&source, Path::new("texts/a.txt")).await.unwrap();
        assert!(!source.exists());
        assert_eq!(backend.contents("texts/a.txt").await.unwrap(), b"hello");
        assert_eq!(backend.list(Some(Path::new("texts"))).await.unwrap(), [FileInfo::new("texts/a.txt")]);
    }

    #[tokio::test]
    async fn test_import_never_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std::fs::write(&source, b"new").unwrap();
        let backend = MockBackend::with_files([("texts/a.txt", b"old")]);

        let err = backend.import(&source, Path::new("texts/a.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert!(source.exists());
        assert_eq!(backend.contents("texts/a.txt").await.unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_failing_imports_leave_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std::fs::write(&source, b"data").unwrap();
        let backend = MockBackend::default().failing_imports(|target| ErrorKind::CrossesDevices(target.into()));
        backend.create_dir(Path::new("texts")).await.unwrap();

        let err = backend.import(&source, Path::new("texts/a.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::CrossesDevices(p) if p == Path::new("texts/a.txt")));
        assert!(source.exists());
        assert!(backend.contents("texts/a.txt").await.is_none());
    }
}
