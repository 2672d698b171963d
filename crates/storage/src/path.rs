//! Path validation for paths handed to a storage backend.
//!
//! Every path below an archive root is relative. Anything that would resolve
//! outside the root (leading `..`, absolute prefixes on Windows) or that the
//! OS would silently truncate (NUL bytes) is rejected before it reaches the
//! filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates and normalizes a path relative to an archive root.
///
/// `.` components and repeated separators disappear, `..` is resolved
/// lexically and must never climb above the root, and a leading `/` is
/// treated as the root itself.
///
/// > **Note:** Symlinks are not resolved; this is purely lexical.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docket_storage::validate_path;
/// assert!(validate_path("texts/2021/2021-07-01--test__sna_fu.txt").is_ok());
/// assert!(validate_path("images/../texts/2021").is_ok());
/// assert!(validate_path("../outside").is_err());
/// assert!(validate_path("texts/../../outside").is_err());
/// assert!(validate_path("texts/\0").is_err());
/// assert_eq!(validate_path("/texts//./2021/").unwrap(), Path::new("texts/2021"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(original.to_path_buf());
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(segment) => {
                // NUL survives `Path::components()` but truncates in syscalls.
                if segment.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                components.push(segment);
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    if components.is_empty() {
        exn::bail!(invalid());
    }
    Ok(components.into_iter().collect())
}
