use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;
use serde_json::{Map, Value};
use std::path::Path;

use super::tree;
use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::ConfigFormat;

/// Reads configuration files into a settings tree
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and parse a configuration file
    ///
    /// Layers (lowest to highest precedence):
    /// 1. The file, parsed as `format`
    /// 2. Environment variables starting with `env_prefix`, `__` separating
    ///    nested keys (`APP_SERVER__PORT` -> `server.port`)
    ///
    /// Keys are lower-cased so lookups are case-insensitive.
    pub fn load(
        path: &Path,
        format: ConfigFormat,
        env_prefix: Option<&str>,
    ) -> ConfigResult<Map<String, Value>> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let mut figment = match format {
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        };
        if let Some(prefix) = env_prefix {
            figment = figment.merge(Env::prefixed(prefix).split("__"));
        }

        let settings: Value = figment.extract().map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        match settings {
            Value::Object(map) => Ok(tree::lowercase_keys(map)),
            Value::Null => Ok(Map::new()),
            other => Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source: Box::new(figment::Error::from(format!(
                    "expected a map at the top level, found {other}"
                ))),
            }),
        }
    }

    /// Format for `path`: its extension when recognised, otherwise `fallback`
    pub fn detect_format(path: &Path, fallback: &str) -> ConfigResult<ConfigFormat> {
        match ConfigFormat::from_path(path) {
            Some(format) => Ok(format),
            None => fallback.parse(),
        }
    }
}
