//! Errors surfaced by the fallible half of the configuration API.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or reading configuration.
///
/// The best-effort accessors never return these; they log them and fall back
/// to a default. The `try_*` family hands them to the caller instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("No configuration registered under '{0}'")]
    UnknownInstance(String),

    #[error("Failed to watch configuration file: {0}")]
    Watch(#[from] notify::Error),

    #[error("Configuration key not set: {0}")]
    MissingKey(String),

    #[error("Cannot read key '{key}' as {target}: {reason}")]
    Coercion {
        key: String,
        target: &'static str,
        reason: String,
    },

    #[error("Failed to deserialize key '{key}': {source}")]
    Unmarshal {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A value could not be converted to the requested type.
///
/// Carries no key; [`CoerceError::at`] attaches one when the failure is
/// reported through [`ConfigError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert to {target}: {reason}")]
pub struct CoerceError {
    pub target: &'static str,
    pub reason: String,
}

impl CoerceError {
    pub(crate) fn new(target: &'static str, reason: impl Into<String>) -> Self {
        Self {
            target,
            reason: reason.into(),
        }
    }

    /// Attach the key that was being read.
    pub fn at(self, key: &str) -> ConfigError {
        ConfigError::Coercion {
            key: key.to_string(),
            target: self.target,
            reason: self.reason,
        }
    }
}
