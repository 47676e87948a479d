//! Process-wide defaults and the free-function accessors
//!
//! The free functions operate on one lazily-built [`ConfigRegistry`] whose
//! options come from the process defaults below. Each default can be set
//! once; once it has been read (or the registry has been built) later
//! setters are ignored.

use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::domain::errors::ConfigResult;
use crate::domain::models::options::{FALLBACK_NAME, FALLBACK_PATH, FALLBACK_TYPE};
use crate::domain::models::RegistryOptions;
use crate::services::{ConfigInstance, ConfigRegistry};

static DEFAULT_NAME: OnceLock<String> = OnceLock::new();
static CONFIG_PATH: OnceLock<String> = OnceLock::new();
static CONFIG_TYPE: OnceLock<String> = OnceLock::new();
static REGISTRY: OnceLock<ConfigRegistry> = OnceLock::new();

fn set_once(cell: &OnceLock<String>, setting: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    if cell.set(value.to_string()).is_err() {
        debug!(setting, value, "default already set, ignoring");
    }
}

/// Set the name [`default`] resolves to; only the first non-empty call counts
pub fn set_default_name(name: &str) {
    set_once(&DEFAULT_NAME, "default_name", name);
}

/// Set the directory names are resolved in; only the first non-empty call counts
pub fn set_config_path(path: &str) {
    set_once(&CONFIG_PATH, "config_path", path);
}

/// Set the file extension names are resolved with; only the first non-empty call counts
pub fn set_config_type(config_type: &str) {
    set_once(&CONFIG_TYPE, "config_type", config_type);
}

/// Current default name, `"config"` unless set
pub fn default_name() -> &'static str {
    DEFAULT_NAME.get_or_init(|| FALLBACK_NAME.to_string())
}

/// Current config directory, `"etc"` unless set
pub fn config_path() -> &'static str {
    CONFIG_PATH.get_or_init(|| FALLBACK_PATH.to_string())
}

/// Current config file extension, `"yaml"` unless set
pub fn config_type() -> &'static str {
    CONFIG_TYPE.get_or_init(|| FALLBACK_TYPE.to_string())
}

/// The process-wide registry, built from the defaults on first use
pub fn registry() -> &'static ConfigRegistry {
    REGISTRY.get_or_init(|| {
        ConfigRegistry::new(
            RegistryOptions::default()
                .with_default_name(default_name())
                .with_config_path(config_path())
                .with_config_type(config_type()),
        )
    })
}

/// Load `path` into the process-wide registry under its file stem
pub fn read(path: impl AsRef<Path>) -> Arc<ConfigInstance> {
    registry().read(path)
}

/// Fallible form of [`read`]
pub fn try_read(path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigInstance>> {
    registry().try_read(path)
}

/// Instance registered under `name`, loaded on first use
pub fn use_name(name: &str) -> Arc<ConfigInstance> {
    registry().use_name(name)
}

/// Instance registered under the default name
pub fn default() -> Arc<ConfigInstance> {
    registry().default_instance()
}

/// Whether `key` is set in the default instance
pub fn is_set(key: &str) -> bool {
    default().is_set(key)
}

/// Settings tree of the default instance
pub fn all() -> Map<String, Value> {
    default().all()
}

/// Leaf keys of the default instance
pub fn keys() -> Vec<String> {
    default().keys()
}

/// Byte size at `key` in the default instance
pub fn get_size_in_bytes(key: &str, default_value: Option<u64>) -> u64 {
    default().get_size_in_bytes(key, default_value)
}

/// Fallible form of [`get_size_in_bytes`]
pub fn try_get_size_in_bytes(key: &str) -> ConfigResult<u64> {
    default().try_get_size_in_bytes(key)
}

macro_rules! impl_global_getters {
    ($($(#[$doc:meta])* $get:ident, $try_get:ident => $t:ty;)*) => {
        $(
            $(#[$doc])*
            ///
            /// Reads the default instance of the process-wide registry.
            pub fn $get(key: &str, default_value: Option<$t>) -> $t {
                default().$get(key, default_value)
            }

            #[doc = concat!("Fallible form of [`", stringify!($get), "`]")]
            pub fn $try_get(key: &str) -> ConfigResult<$t> {
                default().$try_get(key)
            }
        )*
    };
}

with_typed_getters!(impl_global_getters);
