//! Layered configuration for docket.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults,
//! 2. `config.toml` in the platform config directory,
//! 3. an explicitly requested file (TOML, YAML or JSON by extension),
//! 4. `DOCKET_*` environment variables, nested keys split on `__`
//!    (`DOCKET_TIME_DEFAULTS__PDF=true`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use docket_catalog::FileType;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "DOCKET_";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute path of the archive root. Required to archive anything.
    pub root: Option<PathBuf>,
    /// Active tenant; absent means the default tenant.
    pub tenant: Option<String>,
    /// Per file type replacement for whether the time of day is used by
    /// default. Keys are canonical [type names](FileType::as_str) once loaded.
    pub time_defaults: HashMap<String, bool>,
    /// Log archive operations instead of performing them.
    pub dry_run: bool,
}

impl Config {
    /// Loads configuration from every source.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::layered(user_config_file(), explicit)?)
    }

    /// Stacks the providers without extracting them.
    ///
    /// `user` may not exist; `explicit` must.
    pub fn layered(user: Option<PathBuf>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user) = user {
            tracing::debug!(path = %user.display(), exists = user.is_file(), "User configuration file");
            figment = figment.merge(Toml::file(user));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::Invalid(format!("configuration file not found: {}", path.display())));
            }
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extracts and validates a configuration.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validated()
    }

    fn validated(mut self) -> Result<Self> {
        if let Some(root) = &self.root {
            if !root.is_absolute() {
                exn::bail!(ErrorKind::Invalid(format!("archive root must be absolute: {}", root.display())));
            }
        }
        self.tenant = self.tenant.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        let mut time_defaults = HashMap::with_capacity(self.time_defaults.len());
        for (name, enabled) in self.time_defaults {
            let file_type = FileType::from_name(&name)
                .or_raise(|| ErrorKind::Invalid(format!("unknown file type in time_defaults: {name}")))?;
            time_defaults.insert(file_type.as_str().to_string(), enabled);
        }
        self.time_defaults = time_defaults;
        Ok(self)
    }

    /// The archive root, or an error explaining how to set one.
    pub fn root(&self) -> Result<&Path> {
        self.root.as_deref().ok_or_raise(|| {
            ErrorKind::Invalid(format!("no archive root configured; set `root` or {ENV_PREFIX}ROOT"))
        })
    }
}

/// `config.toml` in the platform's per-user configuration directory.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "docket").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
