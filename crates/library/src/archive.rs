use crate::ArchiveProperties;
use crate::error::{ErrorKind, Result};
use crate::name::{ArchiveName, extension_of};
use docket_catalog::FileType;
use docket_storage::BackendHandle;
use docket_storage::error::ErrorKind as StorageErrorKind;
use docket_storage::layout;
use exn::ResultExt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Moves `source` into the archive under the name encoded from `props`, and
/// returns the file's new absolute location.
///
/// The file is classified by its extension (unknown extensions are filed
/// under [`misc`](docket_catalog::TypeGroup::Misc)) and lands in
/// `<group>/<year>/` beneath the backend root, which is created if missing.
/// Nothing is ever overwritten.
///
/// On success the source path no longer exists and the returned path holds
/// the same bytes. On failure the source file is untouched; the target
/// directory may have been left behind, empty.
///
/// # Errors
/// - [`ErrorKind::SourceMissing`] when `source` is not an existing regular file.
/// - [`ErrorKind::TargetDirectory`] when the target directory can't be created.
/// - [`ErrorKind::NameCollision`] when the encoded name is already taken.
/// - [`ErrorKind::MoveFailed`] when the filesystem refuses the move, for
///   example because `source` is on another device.
#[instrument(skip_all, fields(backend = backend.name(), source = %source.as_ref().display()))]
pub async fn archive_file(
    backend: &BackendHandle,
    source: impl AsRef<Path>,
    props: &ArchiveProperties,
) -> Result<PathBuf> {
    let source = std::path::absolute(source.as_ref()).or_raise(|| ErrorKind::SourceMissing(source.as_ref().into()))?;
    match fs::metadata(&source).await {
        Ok(metadata) if metadata.is_file() => {},
        Ok(_) => exn::bail!(ErrorKind::SourceMissing(source)),
        Err(e) => return Err(e).or_raise(|| ErrorKind::SourceMissing(source)),
    }

    let file_name = source.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    let extension = extension_of(&file_name);
    let file_type = FileType::from_extension(extension);

    let directory = layout::archive_dir(file_type.group(), props.date.year());
    backend.create_dir(&directory).await.or_raise(|| ErrorKind::TargetDirectory(directory.clone()))?;

    let name = ArchiveName::new(props, extension);
    let target = directory.join(name.to_string());
    let location = backend.locate(&target).or_raise(|| ErrorKind::MoveFailed(target.clone()))?;
    if backend.exists(&target).await.or_raise(|| ErrorKind::MoveFailed(location.clone()))? {
        exn::bail!(ErrorKind::NameCollision(location));
    }
    match backend.import(&source, &target).await {
        Ok(()) => {},
        // Claimed between the check above and the move.
        Err(e) if matches!(e.deref(), StorageErrorKind::AlreadyExists(_)) => {
            return Err(e).or_raise(|| ErrorKind::NameCollision(location));
        },
        Err(e) => return Err(e).or_raise(|| ErrorKind::MoveFailed(location)),
    }

    tracing::info!(%file_type, group = %file_type.group(), location = %location.display(), "Archived file");
    Ok(location)
}
