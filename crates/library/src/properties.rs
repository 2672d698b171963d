use docket_catalog::FileType;
use std::collections::HashMap;
use time::{Date, PrimitiveDateTime, Time};

/// Everything the caller chose for one file about to be archived.
///
/// Constructed per archiving action and consumed by
/// [`archive_file`](crate::archive_file). The time of day is only encoded
/// into the filename when present; the tag list never holds duplicates and
/// keeps the order tags were added in.
///
/// ```
/// use docket_library::ArchiveProperties;
/// use time::macros::date;
///
/// let props = ArchiveProperties::new(date!(2021 - 07 - 01))
///     .with_description("test")
///     .with_tags(["sna", "fu", "sna"]);
/// assert_eq!(props.tags(), ["sna", "fu"]);
/// assert!(props.time.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveProperties {
    pub date: Date,
    /// `Some` when the time of day should be part of the filename.
    pub time: Option<Time>,
    pub description: String,
    tags: Vec<String>,
}
impl ArchiveProperties {
    pub fn new(date: Date) -> Self {
        Self {
            date,
            time: None,
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Seeds properties for a file type the way a user would first see them:
    /// stamped with `now`, using the time of day only if the type does so by
    /// default.
    ///
    /// `overrides` maps [file type names](FileType::as_str) to a replacement
    /// for [`FileType::uses_time_by_default`].
    pub fn for_file_type(file_type: FileType, now: PrimitiveDateTime, overrides: &HashMap<String, bool>) -> Self {
        let use_time = overrides.get(file_type.as_str()).copied().unwrap_or_else(|| file_type.uses_time_by_default());
        Self::new(now.date()).with_time(use_time.then(|| now.time()))
    }

    pub fn with_time(mut self, time: impl Into<Option<Time>>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag(tag);
        self
    }

    pub fn with_tags<T: Into<String>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    /// Appends a tag unless an identical one is already present. Returns
    /// whether the tag was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Tags in the order they were added.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn utilizes_time(&self) -> bool {
        self.time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_tags_deduplicate_and_keep_order() {
        let mut props = ArchiveProperties::new(date!(2021 - 07 - 01)).with_tags(["b", "a", "b"]).with_tag("c");
        assert_eq!(props.tags(), ["b", "a", "c"]);
        assert!(!props.add_tag("a"));
        assert!(props.add_tag("d"));
        assert_eq!(props.tags(), ["b", "a", "c", "d"]);
    }

    #[rstest]
    #[case(FileType::Jpeg, true)]
    #[case(FileType::Mp3, true)]
    #[case(FileType::Pdf, false)]
    #[case(FileType::Text, false)]
    fn test_for_file_type_defaults(#[case] file_type: FileType, #[case] uses_time: bool) {
        let now = datetime!(2021-07-01 13:45:10);
        let props = ArchiveProperties::for_file_type(file_type, now, &HashMap::new());
        assert_eq!(props.date, date!(2021 - 07 - 01));
        assert_eq!(props.utilizes_time(), uses_time);
        if uses_time {
            assert_eq!(props.time, Some(time!(13:45:10)));
        }
    }

    #[test]
    fn test_for_file_type_overrides() {
        let now = datetime!(2021-07-01 13:45:10);
        let overrides = HashMap::from([("pdf".to_string(), true), ("jpeg".to_string(), false)]);
        assert!(ArchiveProperties::for_file_type(FileType::Pdf, now, &overrides).utilizes_time());
        assert!(!ArchiveProperties::for_file_type(FileType::Jpeg, now, &overrides).utilizes_time());
        assert!(ArchiveProperties::for_file_type(FileType::Png, now, &overrides).utilizes_time());
    }
}
