use crate::error::{ErrorKind, Result};
use crate::name::tags_from_filename;
use docket_catalog::FileType;
use docket_storage::BackendHandle;
use docket_storage::layout;
use exn::ResultExt;
use futures::TryStreamExt;
use std::collections::BTreeSet;
use tracing::instrument;

/// Collects every tag ever used for files in the same group as `file_type`.
///
/// There is no index: the group directory is walked recursively on every
/// call and each filename is reverse-parsed with [`tags_from_filename`].
/// Files whose names don't follow the archive grammar contribute nothing. A
/// group that has never been archived to yields an empty set.
///
/// # Errors
/// Returns [`ErrorKind::Storage`] if the walk itself fails (for example, a
/// directory that can't be read).
#[instrument(skip(backend), fields(backend = backend.name()))]
pub async fn existing_tags(backend: &BackendHandle, file_type: FileType) -> Result<BTreeSet<String>> {
    let directory = layout::group_dir(file_type.group());
    let mut files = backend.list_stream(Some(&directory));
    let mut tags = BTreeSet::new();
    let mut scanned = 0usize;
    while let Some(file) = files.try_next().await.or_raise(|| ErrorKind::Storage)? {
        scanned += 1;
        let Some(name) = file.file_name() else {
            tracing::debug!(path = %file.path.display(), "Skipping non-UTF-8 filename");
            continue;
        };
        let before = tags.len();
        let mut found = false;
        for tag in tags_from_filename(name) {
            found = true;
            if !tags.contains(tag) {
                tags.insert(tag.to_string());
            }
        }
        if !found {
            tracing::debug!(path = %file.path.display(), "No tags in filename");
        } else if tags.len() > before {
            tracing::trace!(path = %file.path.display(), new = tags.len() - before, "Discovered tags");
        }
    }
    tracing::debug!(group = %file_type.group(), scanned, tags = tags.len(), "Tag discovery complete");
    Ok(tags)
}
