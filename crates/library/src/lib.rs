//! Filing files into a docket archive, and reading back what was filed.
//!
//! An archive is a directory tree of `<group>/<year>/<encoded name>`, where
//! the encoded name (see [`ArchiveName`]) carries the date, optional time,
//! description, and tags of the file. [`archive_file`] moves a file in;
//! [`existing_tags`] recovers the tags already used for a type group.

mod archive;
pub mod error;
mod name;
mod properties;
mod tags;

pub use crate::archive::archive_file;
pub use crate::name::{ArchiveName, extension_of, tags_from_filename};
pub use crate::properties::ArchiveProperties;
pub use crate::tags::existing_tags;
