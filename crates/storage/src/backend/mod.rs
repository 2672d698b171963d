//! Storage backend trait and implementations.
//!
//! A backend is rooted at one archive (or tenant) namespace. All paths passed
//! to it are relative to that root and validated with
//! [`validate_path`](crate::validate_path); the only exception is the source
//! of [`import`](StorageBackend::import), which lives outside the archive.

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::{ImportFailure, MockBackend};
pub use self::ro::ReadOnlyBackend;
use crate::FileInfo;
use crate::error::Result;
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;

pub(crate) type FileInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<FileInfo>> + Send + 'a>>;

/// Unified interface over the filesystem holding an archive.
///
/// The archive is write-once: files are only ever *imported* (moved in from
/// outside) and never overwritten, so there is no `write`, `rename`, or
/// `delete`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docket_storage::{backend::StorageBackend, error::Result};
///
/// async fn count_texts(backend: &dyn StorageBackend) -> Result<usize> {
///     Ok(backend.list(Some(Path::new("texts"))).await?.len())
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// Absolute location of a relative storage path.
    fn locate(&self, path: &Path) -> Result<PathBuf>;

    /// List all files beneath an optional directory prefix.
    ///
    /// Collects [`list_stream()`](Self::list_stream) into a [`Vec`].
    async fn list(&self, prefix: Option<&Path>) -> Result<Vec<FileInfo>> {
        self.list_stream(prefix).try_collect().await
    }

    /// Stream metadata of every file beneath an optional directory prefix,
    /// descending into subdirectories.
    ///
    /// Directories themselves are never yielded. A prefix that does not exist
    /// yields an empty stream rather than an error.
    ///
    /// ```
    /// use futures::TryStreamExt;
    /// use std::path::Path;
    /// # use docket_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// let mut stream = backend.list_stream(Some(Path::new("images/2021")));
    /// while let Some(info) = stream.try_next().await? {
    ///     println!("{}", info.path.display());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a>;

    /// Check if a file (or directory) exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a directory and every missing ancestor, including the backend
    /// root itself. Succeeds if the directory already exists.
    async fn create_dir(&self, path: &Path) -> Result<()>;

    /// Move an external file into the archive without ever overwriting.
    ///
    /// `source` is an absolute path outside the backend; `target` is relative
    /// to the backend root and its parent directory must already exist.
    ///
    /// # Errors
    /// - [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists) if
    ///   `target` is taken.
    /// - [`CrossesDevices`](crate::error::ErrorKind::CrossesDevices) if the
    ///   source lives on another filesystem.
    ///
    /// On error the source file is left where it was.
    async fn import(&self, source: &Path, target: &Path) -> Result<()>;
}
