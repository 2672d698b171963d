//! The archived filename codec.
//!
//! An archived file carries all of its properties in its name; there is no
//! other record of them:
//!
//! ```text
//! <yyyy-MM-dd>[-HH-mm-ss] "--" <description> "__" <tag>("_"<tag>)* "." <extension>
//! ```
//!
//! Descriptions and tags are sanitized on the way in (see
//! [`docket_storage::sanitize`]), which guarantees neither contains `_` or
//! `.`. The extension is kept as given, except that runs of `_` in it are
//! collapsed so it can never hold a `__`. Together that makes the last `__`
//! and the last `.` of a name always delimit the tags.

use crate::ArchiveProperties;
use crate::error::{Error, ErrorKind};
use docket_storage::sanitize::{description_safe, tag_safe};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

const DESCRIPTION_SEPARATOR: &str = "--";
const TAG_SEPARATOR: &str = "__";
const TAG_DELIMITER: &str = "_";

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]-[hour]-[minute]-[second]");
/// `yyyy-MM-dd`
const DATE_LEN: usize = 10;
/// `yyyy-MM-dd-HH-mm-ss`
const DATETIME_LEN: usize = 19;

/// The decoded form of an archived filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveName {
    pub date: Date,
    pub time: Option<Time>,
    pub description: String,
    pub tags: Vec<String>,
    /// Original extension, case preserved, without the dot.
    pub extension: String,
}
impl ArchiveName {
    /// Builds the name a file with `extension` gets when archived with `props`.
    ///
    /// The description is passed through [`description_safe`] and every tag
    /// through [`tag_safe`]; tags that sanitize to nothing are dropped and
    /// duplicates created by sanitizing are suppressed. An extension such as
    /// `x__y` is written as `x_y`.
    pub fn new(props: &ArchiveProperties, extension: impl Into<String>) -> Self {
        let mut extension = extension.into();
        while extension.contains(TAG_SEPARATOR) {
            extension = extension.replace(TAG_SEPARATOR, TAG_DELIMITER);
        }
        let mut tags: Vec<String> = Vec::with_capacity(props.tags().len());
        for tag in props.tags().iter().map(|t| tag_safe(t)) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self {
            date: props.date,
            time: props.time,
            description: description_safe(&props.description),
            tags,
            extension,
        }
    }

    fn parse_stamp(head: &str) -> Option<(Date, Option<Time>, &str)> {
        if head.get(DATE_LEN..DATE_LEN + DESCRIPTION_SEPARATOR.len()) == Some(DESCRIPTION_SEPARATOR) {
            let date = Date::parse(head.get(..DATE_LEN)?, DATE_FORMAT).ok()?;
            return Some((date, None, &head[DATE_LEN + DESCRIPTION_SEPARATOR.len()..]));
        }
        if head.get(DATETIME_LEN..DATETIME_LEN + DESCRIPTION_SEPARATOR.len()) == Some(DESCRIPTION_SEPARATOR) {
            let datetime = PrimitiveDateTime::parse(head.get(..DATETIME_LEN)?, DATETIME_FORMAT).ok()?;
            return Some((datetime.date(), Some(datetime.time()), &head[DATETIME_LEN + DESCRIPTION_SEPARATOR.len()..]));
        }
        None
    }
}
impl Display for ArchiveName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let date = self.date;
        write!(f, "{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())?;
        if let Some(time) = self.time {
            write!(f, "-{:02}-{:02}-{:02}", time.hour(), time.minute(), time.second())?;
        }
        write!(
            f,
            "{DESCRIPTION_SEPARATOR}{}{TAG_SEPARATOR}{}.{}",
            self.description,
            self.tags.join(TAG_DELIMITER),
            self.extension
        )
    }
}
impl FromStr for ArchiveName {
    type Err = Error;

    /// Decodes a filename that follows the full grammar.
    ///
    /// Stricter than [`tags_from_filename`]: the date stamp must parse and
    /// both separators must be present.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::InvalidName(name.to_string());
        let Some(dot) = name.rfind('.') else { exn::bail!(invalid()) };
        let (stem, extension) = (&name[..dot], &name[dot + 1..]);
        let Some(separator) = stem.rfind(TAG_SEPARATOR) else { exn::bail!(invalid()) };
        let (head, tags) = (&stem[..separator], &stem[separator + TAG_SEPARATOR.len()..]);
        let Some((date, time, description)) = Self::parse_stamp(head) else { exn::bail!(invalid()) };
        Ok(Self {
            date,
            time,
            description: description.to_string(),
            tags: tags.split(TAG_DELIMITER).filter(|t| !t.is_empty()).map(str::to_string).collect(),
            extension: extension.to_string(),
        })
    }
}

/// The extension of a file name: everything after the last `.`, or nothing
/// when there is no dot or the only dot starts the name.
///
/// ```
/// use docket_library::extension_of;
/// assert_eq!(extension_of("scan.PDF"), "PDF");
/// assert_eq!(extension_of("backup.tar.gz"), "gz");
/// assert_eq!(extension_of(".profile"), "");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => "",
        Some(dot) => &file_name[dot + 1..],
    }
}

/// Recovers the tags of an archived filename.
///
/// Looks at the text between the last `__` and the last `.`; when that span
/// is non-empty it is split on `_`. Names of any other shape yield nothing.
///
/// ```
/// use docket_library::tags_from_filename;
/// let tags: Vec<_> = tags_from_filename("2021-07-01--test__sna_fu.txt").collect();
/// assert_eq!(tags, ["sna", "fu"]);
/// assert_eq!(tags_from_filename("plainfile.txt").count(), 0);
/// ```
pub fn tags_from_filename(name: &str) -> impl Iterator<Item = &str> {
    let segment = match (name.rfind(TAG_SEPARATOR), name.rfind('.')) {
        (Some(separator), Some(dot)) if dot > separator + TAG_SEPARATOR.len() => {
            Some(&name[separator + TAG_SEPARATOR.len()..dot])
        },
        _ => None,
    };
    segment.into_iter().flat_map(|tags| tags.split(TAG_DELIMITER)).filter(|tag| !tag.is_empty())
}
