use crate::error::{Error, ErrorKind, Result};
use crate::FileType;
use exn::OptionExt;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// Extension alias to file type, built from [`FileType::extensions`].
static EXTENSIONS: LazyLock<HashMap<&'static str, FileType>> = LazyLock::new(|| {
    FileType::ALL
        .iter()
        .flat_map(|file_type| file_type.extensions().iter().map(move |ext| (*ext, *file_type)))
        .collect()
});

/// Classifies an extension (without the leading dot), case-insensitively.
///
/// With `lenient` set, unknown extensions classify as [`FileType::Unsupported`];
/// otherwise they fail with [`ErrorKind::UnknownExtension`].
///
/// ```
/// use docket_catalog::{FileType, classify};
/// assert_eq!(classify("JPG", false).unwrap(), FileType::Jpeg);
/// assert_eq!(classify("xyz", true).unwrap(), FileType::Unsupported);
/// assert!(classify("xyz", false).is_err());
/// ```
pub fn classify(extension: &str, lenient: bool) -> Result<FileType> {
    match FileType::lookup(extension) {
        Some(file_type) => Ok(file_type),
        None if lenient => Ok(FileType::Unsupported),
        None => exn::bail!(ErrorKind::UnknownExtension(extension.to_string())),
    }
}

impl FromStr for FileType {
    type Err = Error;

    /// Strict classification by extension.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        classify(s, false)
    }
}

impl FileType {
    fn lookup(extension: &str) -> Option<FileType> {
        EXTENSIONS.get(extension.trim().to_lowercase().as_str()).copied()
    }

    /// Lenient classification by extension (without the leading dot).
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        Self::lookup(extension).unwrap_or(FileType::Unsupported)
    }

    /// Lenient classification using the extension of a file path.
    ///
    /// The extension is everything after the last `.` of the file name. A name
    /// without a dot, or whose only dot is the first character (`.bashrc`),
    /// has no extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unsupported)
    }

    /// Looks a type up by its [name](Self::as_str), falling back to treating
    /// the input as an extension.
    pub fn from_name(name: &str) -> Result<Self> {
        let needle = name.trim().to_lowercase();
        match FileType::ALL.iter().find(|t| t.as_str() == needle) {
            Some(file_type) => Ok(*file_type),
            None => Self::lookup(&needle).ok_or_raise(|| ErrorKind::UnknownName(name.to_string())),
        }
    }
}
