//! Canonical directory layout of an archive.
//!
//! ```text
//! <root>[/@<tenant>]/<group>/<year>/<encoded filename>
//! ```
//!
//! Pure path joining; nothing here touches the filesystem. The relative
//! variants ([`group_dir`], [`archive_dir`]) are what the archive engine hands
//! to a [`StorageBackend`](crate::StorageBackend) rooted at the tenant
//! namespace.

use crate::sanitize::filename_safe;
use docket_catalog::TypeGroup;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

/// Marks a tenant folder. Outside every sanitizer allow-list, so a tenant
/// folder can never be mistaken for a type-group directory.
pub const TENANT_PREFIX: char = '@';

/// Name reserved for the tenant that maps to the archive root itself.
const DEFAULT_TENANT: &str = "default";

/// An optional namespace nested directly beneath the archive root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tenant {
    /// The archive root itself.
    #[default]
    Default,
    /// `<root>/@<name>`; the name is always filename-safe and non-empty.
    Named(String),
}
impl Tenant {
    /// Builds a tenant from a user-supplied name.
    ///
    /// The name is passed through [`filename_safe`]. Names that sanitize to
    /// nothing, or to `default` (case-insensitively), yield [`Tenant::Default`].
    ///
    /// ```
    /// use docket_storage::Tenant;
    /// assert_eq!(Tenant::named("My Family"), Tenant::Named("My-Family".to_string()));
    /// assert_eq!(Tenant::named("  "), Tenant::Default);
    /// assert_eq!(Tenant::named("Default"), Tenant::Default);
    /// ```
    pub fn named(name: impl AsRef<str>) -> Self {
        let name = filename_safe(name.as_ref());
        if name.is_empty() || name.eq_ignore_ascii_case(DEFAULT_TENANT) {
            return Self::Default;
        }
        Self::Named(name)
    }

    /// The folder name beneath the root, or `None` for the default tenant.
    pub fn folder(&self) -> Option<String> {
        match self {
            Self::Default => None,
            Self::Named(name) => Some(format!("{TENANT_PREFIX}{name}")),
        }
    }
}
impl From<Option<String>> for Tenant {
    fn from(value: Option<String>) -> Self {
        value.map(Self::named).unwrap_or_default()
    }
}
impl Display for Tenant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Default => write!(f, "{DEFAULT_TENANT}"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// The root of a tenant's namespace: `root` itself for the default tenant,
/// otherwise `root/@<name>`.
pub fn tenant_namespace(root: impl AsRef<Path>, tenant: &Tenant) -> PathBuf {
    match tenant.folder() {
        None => root.as_ref().to_path_buf(),
        Some(folder) => root.as_ref().join(folder),
    }
}

/// Directory of a type-group, relative to a (tenant) root.
pub fn group_dir(group: TypeGroup) -> PathBuf {
    PathBuf::from(group.directory())
}

/// Directory for a type-group and year, relative to a (tenant) root.
///
/// Years are rendered as four zero-padded decimal digits.
pub fn archive_dir(group: TypeGroup, year: i32) -> PathBuf {
    group_dir(group).join(format!("{year:04}"))
}

/// `root/<group>`
pub fn group_folder(root: impl AsRef<Path>, group: TypeGroup) -> PathBuf {
    root.as_ref().join(group_dir(group))
}

/// `root/<group>/<year>`
pub fn archive_folder(root: impl AsRef<Path>, group: TypeGroup, year: i32) -> PathBuf {
    root.as_ref().join(archive_dir(group, year))
}
