//! Local filesystem storage backend.
//!
//! Files live in a directory on the local filesystem, accessed through
//! `tokio::fs`.

use crate::backend::{FileInfoStream, StorageBackend};
use crate::error::{ErrorKind, Result};
use crate::{FileInfo, path::validate as validate_path};
use async_stream::stream;
use async_trait::async_trait;
use exn::ResultExt;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirEntry};

enum WalkEntry {
    File(FileInfo),
    Descend(PathBuf),
    Skip,
}

/// Local filesystem storage backend.
///
/// All paths are relative to the configured root directory. The root does not
/// need to exist yet; it is created along with the first archive directory.
///
/// ```no_run
/// use docket_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("archive", "/home/me/Archive")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if `root` is relative
    /// or exists but is not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() && !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    /// Validates a relative storage path and joins it onto the root.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    /// Strips the root prefix from an absolute path found while walking.
    fn relative_path(&self, absolute: impl AsRef<Path>) -> Result<PathBuf> {
        let absolute = absolute.as_ref();
        let relative = absolute.strip_prefix(&self.root).or_raise(|| {
            ErrorKind::BackendError(format!("path `{:?}` is not within root `{:?}`", absolute, self.root))
        })?;
        validate_path(relative)
    }

    fn map_io_error(e: IoError, path: &Path) -> ErrorKind {
        match e.kind() {
            IoErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            IoErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            IoErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.to_path_buf()),
            IoErrorKind::CrossesDevices => ErrorKind::CrossesDevices(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn process_entry(&self, entry: DirEntry) -> Result<WalkEntry> {
        let path = entry.path();
        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            // Removed since the directory was read.
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(WalkEntry::Skip),
            Err(e) => exn::bail!(Self::map_io_error(e, &path)),
        };
        if file_type.is_dir() {
            return Ok(WalkEntry::Descend(path));
        }
        if file_type.is_file() {
            return Ok(WalkEntry::File(FileInfo::new(self.relative_path(&path)?)));
        }
        // Note: symlinks are not followed.
        Ok(WalkEntry::Skip)
    }

    /// Whether a failed hard link means the filesystem can't link at all, as
    /// opposed to the move itself being impossible.
    fn links_unavailable(kind: IoErrorKind) -> bool {
        matches!(kind, IoErrorKind::Unsupported | IoErrorKind::PermissionDenied)
    }

    /// Check-then-rename, for filesystems that cannot hard link. There is a
    /// window between the check and the rename in which another writer could
    /// claim `to`; acceptable for a single interactive user.
    async fn import_unguarded(&self, source: &Path, to: &Path, target: &Path) -> Result<()> {
        if fs::try_exists(to).await.map_err(ErrorKind::Io)? {
            exn::bail!(ErrorKind::AlreadyExists(target.to_path_buf()));
        }
        Ok(fs::rename(source, to).await.map_err(|e| Self::map_io_error(e, source))?)
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        self.absolute_path(path)
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a> {
        let start_dir = match prefix.map(|pfx| self.absolute_path(pfx)).transpose() {
            Ok(dir) => dir.unwrap_or_else(|| self.root.clone()),
            Err(e) => return Box::pin(futures::stream::once(async { Result::Err(e) })),
        };
        let mut stack = vec![start_dir];

        Box::pin(stream! {
            'dirs: while let Some(current) = stack.pop() {
                let mut entries = match fs::read_dir(&current).await {
                    Ok(entries) => entries,
                    // Nothing archived here yet.
                    Err(err) if err.kind() == IoErrorKind::NotFound => continue,
                    Err(err) => {
                        yield Err(exn::Exn::from(Self::map_io_error(err, &current)));
                        continue 'dirs;
                    }
                };

                'entries: loop {
                    let entry = match entries.next_entry().await {
                        Ok(Some(entry)) => entry,
                        Ok(None) => break 'entries,
                        Err(e) => { yield Err(exn::Exn::from(Self::map_io_error(e, &current))); continue 'entries; },
                    };
                    match self.process_entry(entry).await {
                        Ok(WalkEntry::File(f)) => yield Ok(f),
                        Ok(WalkEntry::Descend(d)) => stack.push(d),
                        Ok(WalkEntry::Skip) => {},
                        Err(e) => yield Err(e),
                    };
                }
            }
        })
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::try_exists(&abs_path).await.map_err(ErrorKind::Io)?)
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::create_dir_all(&abs_path).await.map_err(|e| Self::map_io_error(e, &abs_path))?)
    }

    async fn import(&self, source: &Path, target: &Path) -> Result<()> {
        if !source.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(source.to_path_buf()));
        }
        let to = self.absolute_path(target)?;
        // A hard link is an atomic create-if-absent: it fails when `to` is
        // taken instead of replacing it. Unlinking the source completes the move.
        match fs::hard_link(source, &to).await {
            Ok(()) => {},
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => {
                exn::bail!(ErrorKind::AlreadyExists(target.to_path_buf()))
            },
            Err(e) if Self::links_unavailable(e.kind()) => {
                tracing::warn!(
                    backend = self.name.as_str(),
                    source = %source.display(),
                    error = %e,
                    "Hard links unavailable; falling back to check-then-rename"
                );
                return self.import_unguarded(source, &to, target).await;
            },
            Err(e) => exn::bail!(Self::map_io_error(e, source)),
        }
        if let Err(e) = fs::remove_file(source).await {
            // Undo the link so the archive does not end up with a copy the
            // caller believes was never made.
            _ = fs::remove_file(&to).await;
            exn::bail!(Self::map_io_error(e, source));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs as std_fs;

    fn backend(dir: &Path) -> LocalBackend {
        LocalBackend::new("test", dir).unwrap()
    }

    #[test]
    fn test_new_requires_absolute_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("name", temp_dir.path()).is_ok());
        assert!(LocalBackend::new("name", temp_dir.path().join("not/yet/created")).is_ok());
        assert!(LocalBackend::new("name", "relative/path").is_err());
        let file = temp_dir.path().join("file.txt");
        std_fs::write(&file, b"data").unwrap();
        assert!(LocalBackend::new("name", &file).is_err());
    }

    #[test]
    fn test_locate() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(temp_dir.path());
        assert_eq!(
            backend.locate(Path::new("texts/2021/a.txt")).unwrap(),
            temp_dir.path().join("texts/2021/a.txt")
        );
        assert!(backend.locate(Path::new("../escape.txt")).is_err());
    }

    #[tokio::test]
    async fn test_create_dir_and_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(&temp_dir.path().join("root"));
        assert!(!backend.exists(Path::new("texts/2021")).await.unwrap());
        backend.create_dir(Path::new("texts/2021")).await.unwrap();
        assert!(backend.exists(Path::new("texts/2021")).await.unwrap());
        // Idempotent
        backend.create_dir(Path::new("texts/2021")).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_dir_below_a_file_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        std_fs::write(temp_dir.path().join("blocker"), b"data").unwrap();
        let backend = backend(&temp_dir.path().join("blocker/root"));
        assert!(backend.create_dir(Path::new("texts/2021")).await.is_err());
    }

    #[tokio::test]
    async fn test_import_moves_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std_fs::write(&source, b"hello").unwrap();
        let backend = backend(&temp_dir.path().join("root"));
        backend.create_dir(Path::new("texts/2021")).await.unwrap();
        backend.import(&source, Path::new("texts/2021/a.txt")).await.unwrap();
        assert!(!source.exists());
        let stored = std_fs::read(temp_dir.path().join("root/texts/2021/a.txt")).unwrap();
        assert_eq!(stored, b"hello");
    }

    #[tokio::test]
    async fn test_import_never_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std_fs::write(&source, b"new").unwrap();
        let backend = backend(&temp_dir.path().join("root"));
        backend.create_dir(Path::new("texts")).await.unwrap();
        std_fs::write(temp_dir.path().join("root/texts/a.txt"), b"old").unwrap();

        let err = backend.import(&source, Path::new("texts/a.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(p) if p == Path::new("texts/a.txt")));
        assert_eq!(std_fs::read(&source).unwrap(), b"new");
        assert_eq!(std_fs::read(temp_dir.path().join("root/texts/a.txt")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_import_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(temp_dir.path());
        let err = backend.import(&temp_dir.path().join("missing.txt"), Path::new("a.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_import_rejects_relative_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(temp_dir.path());
        let err = backend.import(Path::new("relative.txt"), Path::new("a.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[rstest]
    #[case(IoErrorKind::Unsupported, true)]
    #[case(IoErrorKind::PermissionDenied, true)]
    #[case(IoErrorKind::AlreadyExists, false)]
    #[case(IoErrorKind::CrossesDevices, false)]
    #[case(IoErrorKind::NotFound, false)]
    fn test_links_unavailable(#[case] kind: IoErrorKind, #[case] expected: bool) {
        assert_eq!(LocalBackend::links_unavailable(kind), expected);
    }

    #[tokio::test]
    async fn test_import_without_links_moves_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std_fs::write(&source, b"hello").unwrap();
        let backend = backend(&temp_dir.path().join("root"));
        backend.create_dir(Path::new("texts/2021")).await.unwrap();

        let target = Path::new("texts/2021/a.txt");
        let to = backend.locate(target).unwrap();
        backend.import_unguarded(&source, &to, target).await.unwrap();
        assert!(!source.exists());
        assert_eq!(std_fs::read(&to).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_import_without_links_never_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std_fs::write(&source, b"new").unwrap();
        let backend = backend(&temp_dir.path().join("root"));
        backend.create_dir(Path::new("texts")).await.unwrap();
        let target = Path::new("texts/a.txt");
        let to = backend.locate(target).unwrap();
        std_fs::write(&to, b"old").unwrap();

        let err = backend.import_unguarded(&source, &to, target).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(p) if p == target));
        assert_eq!(std_fs::read(&source).unwrap(), b"new");
        assert_eq!(std_fs::read(&to).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_list_recurses_and_skips_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(temp_dir.path());
        std_fs::create_dir_all(temp_dir.path().join("texts/2020")).unwrap();
        std_fs::create_dir_all(temp_dir.path().join("texts/2021/nested")).unwrap();
        std_fs::create_dir_all(temp_dir.path().join("images/2021")).unwrap();
        std_fs::write(temp_dir.path().join("texts/2020/a.txt"), b"a").unwrap();
        std_fs::write(temp_dir.path().join("texts/2021/b.txt"), b"b").unwrap();
        std_fs::write(temp_dir.path().join("texts/2021/nested/c.txt"), b"c").unwrap();
        std_fs::write(temp_dir.path().join("images/2021/d.jpg"), b"d").unwrap();

        let mut paths: Vec<_> =
            backend.list(Some(Path::new("texts"))).await.unwrap().into_iter().map(|f| f.path).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("texts/2020/a.txt"),
                PathBuf::from("texts/2021/b.txt"),
                PathBuf::from("texts/2021/nested/c.txt"),
            ]
        );
        assert_eq!(backend.list(None).await.unwrap().len(), 4);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_skips_dangling_links() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(temp_dir.path());
        std_fs::create_dir_all(temp_dir.path().join("texts/2021")).unwrap();
        std_fs::write(temp_dir.path().join("texts/2021/a.txt"), b"a").unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone.txt"), temp_dir.path().join("texts/2021/b.txt")).unwrap();

        let files = backend.list(Some(Path::new("texts"))).await.unwrap();
        assert_eq!(files, [FileInfo::new("texts/2021/a.txt")]);
    }

    #[tokio::test]
    async fn test_list_nonexistent_prefix() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(&temp_dir.path().join("never-created"));
        assert!(backend.list(Some(Path::new("texts"))).await.unwrap().is_empty());
        assert!(backend.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_security() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = backend(temp_dir.path());
        assert!(backend.exists(Path::new("../etc/passwd")).await.is_err());
        assert!(backend.create_dir(Path::new("texts/../../escape")).await.is_err());
        assert!(backend.list(Some(Path::new("../"))).await.is_err());
    }
}
