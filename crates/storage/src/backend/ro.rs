//! Read-only storage backend.
//!
//! Wraps another backend and turns every mutation into a logged no-op that
//! reports success. Used for dry runs.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::{BackendHandle, StorageBackend, backend::FileInfoStream, error::Result};

/// Read-only storage backend.
///
/// Reads pass through to the inner backend; [`create_dir`](StorageBackend::create_dir)
/// and [`import`](StorageBackend::import) are skipped with an
/// [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        self.inner.locate(path)
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a> {
        self.inner.list_stream(prefix)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path).await
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "Skipping directory creation during read-only mode");
        Ok(())
    }

    async fn import(&self, source: &Path, target: &Path) -> Result<()> {
        tracing::info!(source = %source.display(), target = %target.display(), "Skipping import during read-only mode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mutations_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("incoming.txt");
        std::fs::write(&source, b"data").unwrap();
        let inner = LocalBackend::new("local", temp_dir.path().join("root")).unwrap();
        let backend = ReadOnlyBackend::new(Arc::new(inner));

        backend.create_dir(Path::new("texts/2021")).await.unwrap();
        backend.import(&source, Path::new("texts/2021/a.txt")).await.unwrap();
        assert!(source.exists());
        assert!(!temp_dir.path().join("root").exists());
        assert_eq!(backend.name(), "local");
    }

    #[tokio::test]
    async fn test_reads_pass_through() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("texts")).unwrap();
        std::fs::write(temp_dir.path().join("texts/a.txt"), b"data").unwrap();
        let backend = ReadOnlyBackend::new(Arc::new(LocalBackend::new("local", temp_dir.path()).unwrap()));

        assert!(backend.exists(Path::new("texts/a.txt")).await.unwrap());
        assert_eq!(backend.list(Some(Path::new("texts"))).await.unwrap().len(), 1);
        assert_eq!(backend.locate(Path::new("texts")).unwrap(), temp_dir.path().join("texts"));
    }
}
