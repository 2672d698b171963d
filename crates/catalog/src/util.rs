use crate::{FileType, TypeGroup};
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for FileType {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl FileType {
    /// Every file type, [`Unsupported`](Self::Unsupported) last.
    pub const ALL: [FileType; 25] = [
        FileType::Pdf,
        FileType::Text,
        FileType::Markdown,
        FileType::Csv,
        FileType::Jpeg,
        FileType::Png,
        FileType::Gif,
        FileType::Bmp,
        FileType::Tiff,
        FileType::Webp,
        FileType::Heic,
        FileType::Document,
        FileType::Spreadsheet,
        FileType::Presentation,
        FileType::Mp3,
        FileType::Wav,
        FileType::Ogg,
        FileType::Flac,
        FileType::Aac,
        FileType::Mp4,
        FileType::Mov,
        FileType::Avi,
        FileType::Mkv,
        FileType::Webm,
        FileType::Unsupported,
    ];

    /// Short, stable name (used as a configuration key and for display).
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Text => "text",
            FileType::Markdown => "markdown",
            FileType::Csv => "csv",
            FileType::Jpeg => "jpeg",
            FileType::Png => "png",
            FileType::Gif => "gif",
            FileType::Bmp => "bmp",
            FileType::Tiff => "tiff",
            FileType::Webp => "webp",
            FileType::Heic => "heic",
            FileType::Document => "document",
            FileType::Spreadsheet => "spreadsheet",
            FileType::Presentation => "presentation",
            FileType::Mp3 => "mp3",
            FileType::Wav => "wav",
            FileType::Ogg => "ogg",
            FileType::Flac => "flac",
            FileType::Aac => "aac",
            FileType::Mp4 => "mp4",
            FileType::Mov => "mov",
            FileType::Avi => "avi",
            FileType::Mkv => "mkv",
            FileType::Webm => "webm",
            FileType::Unsupported => "unsupported",
        }
    }

    /// Lowercase extension aliases that classify as this type.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Pdf => &["pdf"],
            FileType::Text => &["txt", "text", "log"],
            FileType::Markdown => &["md", "markdown"],
            FileType::Csv => &["csv"],
            FileType::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            FileType::Png => &["png"],
            FileType::Gif => &["gif"],
            FileType::Bmp => &["bmp"],
            FileType::Tiff => &["tif", "tiff"],
            FileType::Webp => &["webp"],
            FileType::Heic => &["heic", "heif"],
            FileType::Document => &["doc", "docx", "odt", "rtf"],
            FileType::Spreadsheet => &["xls", "xlsx", "ods"],
            FileType::Presentation => &["ppt", "pptx", "odp"],
            FileType::Mp3 => &["mp3"],
            FileType::Wav => &["wav"],
            FileType::Ogg => &["ogg", "oga", "opus"],
            FileType::Flac => &["flac"],
            FileType::Aac => &["m4a", "aac"],
            FileType::Mp4 => &["mp4", "m4v"],
            FileType::Mov => &["mov", "qt"],
            FileType::Avi => &["avi"],
            FileType::Mkv => &["mkv"],
            FileType::Webm => &["webm"],
            FileType::Unsupported => &[],
        }
    }

    /// The group this type is filed under.
    #[must_use]
    pub fn group(&self) -> TypeGroup {
        match self {
            FileType::Pdf => TypeGroup::Pdfs,
            FileType::Text | FileType::Markdown | FileType::Csv => TypeGroup::Texts,
            FileType::Jpeg
            | FileType::Png
            | FileType::Gif
            | FileType::Bmp
            | FileType::Tiff
            | FileType::Webp
            | FileType::Heic => TypeGroup::Images,
            FileType::Document | FileType::Spreadsheet | FileType::Presentation => TypeGroup::Office,
            FileType::Mp3 | FileType::Wav | FileType::Ogg | FileType::Flac | FileType::Aac => TypeGroup::Audio,
            FileType::Mp4 | FileType::Mov | FileType::Avi | FileType::Mkv | FileType::Webm => TypeGroup::Videos,
            FileType::Unsupported => TypeGroup::Misc,
        }
    }

    /// Whether the time of day should be offered (and used) by default.
    ///
    /// Photos and recordings capture a moment; documents usually only need
    /// the day.
    #[must_use]
    pub fn uses_time_by_default(&self) -> bool {
        matches!(self.group(), TypeGroup::Images | TypeGroup::Audio | TypeGroup::Videos)
    }
}

impl Display for TypeGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.directory())
    }
}

impl TypeGroup {
    pub const ALL: [TypeGroup; 7] = [
        TypeGroup::Pdfs,
        TypeGroup::Texts,
        TypeGroup::Images,
        TypeGroup::Office,
        TypeGroup::Audio,
        TypeGroup::Videos,
        TypeGroup::Misc,
    ];

    /// Directory segment directly beneath the archive (or tenant) root.
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &'static str {
        match self {
            TypeGroup::Pdfs => "pdfs",
            TypeGroup::Texts => "texts",
            TypeGroup::Images => "images",
            TypeGroup::Office => "office",
            TypeGroup::Audio => "audio",
            TypeGroup::Videos => "videos",
            TypeGroup::Misc => "misc",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{FileType, TypeGroup};
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(TypeGroup::Pdfs, "pdfs")]
    #[case(TypeGroup::Texts, "texts")]
    #[case(TypeGroup::Images, "images")]
    #[case(TypeGroup::Office, "office")]
    #[case(TypeGroup::Audio, "audio")]
    #[case(TypeGroup::Videos, "videos")]
    #[case(TypeGroup::Misc, "misc")]
    fn test_group_directory(#[case] group: TypeGroup, #[case] expected: &str) {
        assert_eq!(group.directory(), expected);
        assert_eq!(group.to_string(), expected);
    }

    #[rstest]
    #[case(FileType::Pdf, TypeGroup::Pdfs, false)]
    #[case(FileType::Text, TypeGroup::Texts, false)]
    #[case(FileType::Jpeg, TypeGroup::Images, true)]
    #[case(FileType::Document, TypeGroup::Office, false)]
    #[case(FileType::Mp3, TypeGroup::Audio, true)]
    #[case(FileType::Mkv, TypeGroup::Videos, true)]
    #[case(FileType::Unsupported, TypeGroup::Misc, false)]
    fn test_group_and_time_default(#[case] file_type: FileType, #[case] group: TypeGroup, #[case] time: bool) {
        assert_eq!(file_type.group(), group);
        assert_eq!(file_type.uses_time_by_default(), time);
    }

    #[test]
    fn test_all_is_exhaustive_and_unique() {
        let unique: HashSet<_> = FileType::ALL.iter().collect();
        assert_eq!(unique.len(), FileType::ALL.len());
        let names: HashSet<_> = FileType::ALL.iter().map(FileType::as_str).collect();
        assert_eq!(names.len(), FileType::ALL.len());
        let grouped: HashSet<_> = FileType::ALL.iter().map(FileType::group).collect();
        assert_eq!(grouped.len(), TypeGroup::ALL.len());
    }

    #[test]
    fn test_group_directories_are_distinct() {
        let dirs: HashSet<_> = TypeGroup::ALL.iter().map(TypeGroup::directory).collect();
        assert_eq!(dirs.len(), TypeGroup::ALL.len());
    }

    #[test]
    fn test_extensions_are_lowercase() {
        for ext in FileType::ALL.iter().flat_map(FileType::extensions) {
            assert_eq!(*ext, ext.to_lowercase());
            assert!(!ext.contains('.'));
        }
    }
}
