//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A strict lookup found no file type for the extension. Callers can
    /// recover by falling back to [`FileType::Unsupported`](crate::FileType::Unsupported).
    #[display("unknown file extension: {_0:?}")]
    UnknownExtension(#[error(not(source))] String),
    /// A type or group name did not match any known value.
    #[display("unknown name: {_0:?}")]
    UnknownName(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Static table; the answer never changes.
        false
    }
}
