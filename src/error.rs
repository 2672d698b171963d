//! Command Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("could not archive {}", _0.display())]
    Archive(#[error(not(source))] PathBuf),
    #[display("could not list tags")]
    Tags,
    #[display("unknown file type or extension: {_0:?}")]
    FileType(#[error(not(source))] String),
}
