//! File type classification for the archive.
//!
//! Every archived file is classified by its extension into a [`FileType`],
//! and every file type belongs to exactly one [`TypeGroup`]. The group decides
//! which top-level archive directory a file lands in; the type decides whether
//! the wall-clock time is offered by default when archiving.
//!
//! - **Lenient** lookups ([`FileType::from_extension`], [`FileType::from_path`])
//!   never fail: unknown extensions map to [`FileType::Unsupported`].
//! - **Strict** lookups ([`FromStr`](std::str::FromStr), [`classify`] with
//!   `lenient = false`) fail with [`ErrorKind::UnknownExtension`](crate::error::ErrorKind::UnknownExtension).
//!
//! The table is static: built once on first use and immutable thereafter.

mod construct;
pub mod error;
mod util;

pub use crate::construct::classify;

/// A closed set of recognised file types.
///
/// Each variant owns a set of case-insensitive extension aliases (see
/// [`FileType::extensions`]); no extension belongs to more than one type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileType {
    /// Portable Document Format (.pdf)
    Pdf,
    /// Plain text (.txt, .text, .log)
    Text,
    /// Markdown (.md, .markdown)
    Markdown,
    /// Comma-separated values (.csv)
    Csv,
    /// JPEG (.jpg, .jpeg, .jpe, .jfif)
    Jpeg,
    /// PNG (.png)
    Png,
    /// GIF (.gif)
    Gif,
    /// Bitmap (.bmp)
    Bmp,
    /// TIFF (.tif, .tiff)
    Tiff,
    /// WebP (.webp)
    Webp,
    /// HEIF/HEIC (.heic, .heif)
    Heic,
    /// Word processor documents (.doc, .docx, .odt, .rtf)
    Document,
    /// Spreadsheets (.xls, .xlsx, .ods)
    Spreadsheet,
    /// Presentations (.ppt, .pptx, .odp)
    Presentation,
    /// MP3 (.mp3)
    Mp3,
    /// Wave (.wav)
    Wav,
    /// Ogg/Opus (.ogg, .oga, .opus)
    Ogg,
    /// FLAC (.flac)
    Flac,
    /// AAC (.m4a, .aac)
    Aac,
    /// MPEG-4 video (.mp4, .m4v)
    Mp4,
    /// QuickTime (.mov, .qt)
    Mov,
    /// AVI (.avi)
    Avi,
    /// Matroska (.mkv)
    Mkv,
    /// WebM (.webm)
    Webm,
    /// Anything not in the table.
    #[default]
    Unsupported,
}

/// Coarse classification that determines the top-level archive directory.
///
/// The directory segments returned by [`TypeGroup::directory`] are part of the
/// on-disk format. Renaming one orphans every archive written before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeGroup {
    Pdfs,
    Texts,
    Images,
    Office,
    Audio,
    Videos,
    #[default]
    Misc,
}
