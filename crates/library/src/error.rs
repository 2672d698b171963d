//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Storage failures are kept as children
//! in the error tree beneath the kind describing what the caller should do.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the failure of an archive or tag discovery operation.
///
/// None of these are retried automatically. All archive failures leave the
/// source file where it was.
///
/// ### Archive Errors
/// - [`ErrorKind::SourceMissing`]
/// - [`ErrorKind::TargetDirectory`]
/// - [`ErrorKind::NameCollision`]
/// - [`ErrorKind::MoveFailed`]
///
/// ### Other Errors
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::InvalidName`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file to archive does not exist or is not a regular file.
    #[display("source file missing: {}", _0.display())]
    SourceMissing(#[error(not(source))] PathBuf),
    /// The target directory could not be created.
    #[display("could not create archive directory: {}", _0.display())]
    TargetDirectory(#[error(not(source))] PathBuf),
    /// A file with the identical encoded name is already archived. Change the
    /// date, time, description, or tags and try again.
    #[display("an archived file already exists at {}", _0.display())]
    NameCollision(#[error(not(source))] PathBuf),
    /// The filesystem refused the move (for example, across devices).
    #[display("could not move file to {}", _0.display())]
    MoveFailed(#[error(not(source))] PathBuf),
    /// Walking the archive tree failed.
    #[display("could not read archive")]
    Storage,
    /// The filename does not follow the archive naming grammar.
    #[display("not an archived filename: {_0:?}")]
    InvalidName(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::NameCollision(PathBuf::from("/a/texts/2021/x.txt")).to_string(),
            "an archived file already exists at /a/texts/2021/x.txt"
        );
        assert_eq!(
            ErrorKind::InvalidName("plain.txt".to_string()).to_string(),
            "not an archived filename: \"plain.txt\""
        );
        assert!(!ErrorKind::MoveFailed(PathBuf::new()).is_retryable());
    }
}
