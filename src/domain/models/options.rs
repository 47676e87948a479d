use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::errors::ConfigError;

pub(crate) const FALLBACK_NAME: &str = "config";
pub(crate) const FALLBACK_PATH: &str = "etc";
pub(crate) const FALLBACK_TYPE: &str = "yaml";

/// Options a [`ConfigRegistry`](crate::ConfigRegistry) is constructed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistryOptions {
    /// Name resolved by `default()`
    #[serde(default = "default_name")]
    pub default_name: String,

    /// Directory holding `<name>.<config_type>` files
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Extension appended to names resolved through `use_name`
    #[serde(default = "default_config_type")]
    pub config_type: String,

    /// Reload instances when their file changes on disk
    #[serde(default = "default_true")]
    pub watch: bool,

    /// Environment variable prefix layered over file values (e.g. `APP_`)
    #[serde(default)]
    pub env_prefix: Option<String>,
}

fn default_name() -> String {
    FALLBACK_NAME.to_string()
}

fn default_config_path() -> PathBuf {
    PathBuf::from(FALLBACK_PATH)
}

fn default_config_type() -> String {
    FALLBACK_TYPE.to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            default_name: default_name(),
            config_path: default_config_path(),
            config_type: default_config_type(),
            watch: true,
            env_prefix: None,
        }
    }
}

impl RegistryOptions {
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_config_type(mut self, config_type: impl Into<String>) -> Self {
        self.config_type = config_type.into();
        self
    }

    pub const fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Path a logical name resolves to: `<config_path>/<name>.<config_type>`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.config_path
            .join(format!("{name}.{}", self.config_type))
    }
}

/// File formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Format implied by the file extension, if it is a known one
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
