//! A single loaded configuration source
//!
//! A [`ConfigInstance`] owns the parsed settings tree of one file, a flattened
//! snapshot of it, and (once started) the watcher that keeps both current.
//! Every getter comes in two forms:
//!
//! - best-effort (`get_int`): never fails, falls back to the supplied default
//!   or the type's zero value and logs why
//! - fallible (`try_get_int`): reports a missing key or a value of the wrong
//!   shape as a [`ConfigError`]

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

use super::coerce::{self, FromConfigValue};
use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::ConfigFormat;
use crate::infrastructure::config::{tree, ConfigLoader, FileWatcher};

type ChangeListener = Arc<dyn Fn(&ConfigInstance) + Send + Sync>;

/// Current contents of an instance, replaced wholesale on reload
#[derive(Debug, Default)]
struct Settings {
    tree: Map<String, Value>,
    snapshot: BTreeMap<String, Value>,
    load_error: Option<String>,
    reloads: u64,
}

impl Settings {
    fn loaded(tree: Map<String, Value>) -> Self {
        let snapshot = tree::flatten(&tree);
        Self {
            tree,
            snapshot,
            load_error: None,
            reloads: 0,
        }
    }

    fn failed(error: &ConfigError) -> Self {
        Self {
            load_error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// One loaded configuration source, addressed by a logical name
pub struct ConfigInstance {
    name: String,
    path: PathBuf,
    format: Option<ConfigFormat>,
    env_prefix: Option<String>,
    settings: RwLock<Settings>,
    listeners: Mutex<Vec<ChangeListener>>,
    watcher: Mutex<Option<FileWatcher>>,
}

impl ConfigInstance {
    fn with_settings(
        name: String,
        path: PathBuf,
        format: Option<ConfigFormat>,
        env_prefix: Option<String>,
        settings: Settings,
    ) -> Self {
        Self {
            name,
            path,
            format,
            env_prefix,
            settings: RwLock::new(settings),
            listeners: Mutex::new(Vec::new()),
            watcher: Mutex::new(None),
        }
    }

    /// Load `path`, logging a failure and continuing with empty settings
    pub(crate) fn open(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        format: ConfigFormat,
        env_prefix: Option<String>,
    ) -> Self {
        let name = name.into();
        let path = path.into();
        let settings = match ConfigLoader::load(&path, format, env_prefix.as_deref()) {
            Ok(tree) => {
                info!(name = %name, path = %path.display(), "config loaded");
                Settings::loaded(tree)
            }
            Err(e) => {
                error!(name = %name, path = %path.display(), error = %e, "config file read failed");
                Settings::failed(&e)
            }
        };
        Self::with_settings(name, path, Some(format), env_prefix, settings)
    }

    /// An empty instance for a file whose format is not understood
    ///
    /// It has no format to re-read the file with, so reloading keeps failing.
    pub(crate) fn unloaded(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        error: &ConfigError,
    ) -> Self {
        Self::with_settings(name.into(), path.into(), None, None, Settings::failed(error))
    }

    /// Load `path`, returning the failure instead of an empty instance
    pub(crate) fn try_open(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        format: ConfigFormat,
        env_prefix: Option<String>,
    ) -> ConfigResult<Self> {
        let name = name.into();
        let path = path.into();
        let tree = ConfigLoader::load(&path, format, env_prefix.as_deref())?;
        info!(name = %name, path = %path.display(), "config loaded");
        Ok(Self::with_settings(
            name,
            path,
            Some(format),
            env_prefix,
            Settings::loaded(tree),
        ))
    }

    /// Build an instance from an in-memory settings tree
    ///
    /// The instance has no backing file: `reload` fails and watching is not
    /// available. Keys are lower-cased like loaded ones.
    pub fn from_value(name: impl Into<String>, settings: Value) -> Self {
        let tree = match settings {
            Value::Object(map) => tree::lowercase_keys(map),
            _ => Map::new(),
        };
        Self::with_settings(
            name.into(),
            PathBuf::new(),
            Some(ConfigFormat::Json),
            None,
            Settings::loaded(tree),
        )
    }

    /// Logical name the instance is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the instance was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format the file is parsed as; `None` when its extension is not supported
    pub const fn format(&self) -> Option<ConfigFormat> {
        self.format
    }

    /// Whether the most recent load or reload succeeded
    ///
    /// After a failed reload the previous settings are still served.
    pub fn is_loaded(&self) -> bool {
        self.settings.read().load_error.is_none()
    }

    /// Why the most recent load or reload failed, if it did
    pub fn load_error(&self) -> Option<String> {
        self.settings.read().load_error.clone()
    }

    /// Number of successful reloads since the instance was created
    pub fn reload_count(&self) -> u64 {
        self.settings.read().reloads
    }

    /// Whether a file watcher is running for this instance
    pub fn is_watching(&self) -> bool {
        self.watcher.lock().is_some()
    }

    /// Start reloading the instance whenever its file changes
    ///
    /// Calling this on an instance that is already watching is a no-op. The
    /// watcher holds only a weak reference, so it stops once the last `Arc` to
    /// the instance is dropped.
    pub fn watch(self: &Arc<Self>) -> ConfigResult<()> {
        let mut slot = self.watcher.lock();
        if slot.is_some() {
            return Ok(());
        }

        let instance: Weak<Self> = Arc::downgrade(self);
        let watcher = FileWatcher::spawn(&self.path, move || {
            if let Some(instance) = instance.upgrade() {
                if let Err(e) = instance.reload() {
                    error!(
                        name = %instance.name,
                        path = %instance.path.display(),
                        error = %e,
                        "config file on change, read failed"
                    );
                }
            }
        })?;
        *slot = Some(watcher);
        Ok(())
    }

    /// Re-read the backing file
    ///
    /// On failure the previous settings stay in place and the failure is
    /// recorded in [`Self::load_error`].
    pub fn reload(&self) -> ConfigResult<()> {
        let loaded = self
            .format
            .ok_or_else(|| {
                let extension = self.path.extension().unwrap_or_default();
                ConfigError::UnsupportedFormat(extension.to_string_lossy().into_owned())
            })
            .and_then(|format| ConfigLoader::load(&self.path, format, self.env_prefix.as_deref()));
        let tree = match loaded {
            Ok(tree) => tree,
            Err(e) => {
                self.settings.write().load_error = Some(e.to_string());
                return Err(e);
            }
        };
        {
            let mut settings = self.settings.write();
            let reloads = settings.reloads + 1;
            *settings = Settings::loaded(tree);
            settings.reloads = reloads;
        }
        info!(name = %self.name, path = %self.path.display(), "config reloaded");

        let listeners: Vec<ChangeListener> = self.listeners.lock().clone();
        for listener in listeners {
            listener(self);
        }
        Ok(())
    }

    /// Register a callback run after every successful reload
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&Self) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Arc::new(listener));
    }

    /// Whether `key` exists, whatever its value (including `null`)
    pub fn is_set(&self, key: &str) -> bool {
        tree::find(&self.settings.read().tree, key).is_some()
    }

    /// The whole settings tree
    pub fn all(&self) -> Map<String, Value> {
        self.settings.read().tree.clone()
    }

    /// Every leaf key in dotted form, sorted
    pub fn keys(&self) -> Vec<String> {
        self.settings.read().snapshot.keys().cloned().collect()
    }

    /// Flattened `dotted.key -> value` copy of the settings
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.settings.read().snapshot.clone()
    }

    /// Read `key` as `T`, falling back to `default` (or `T::default()`)
    ///
    /// An unset or `null` key yields the fallback silently. A value that
    /// cannot be coerced yields the fallback and is logged.
    pub fn get_as<T>(&self, key: &str, default: Option<T>) -> T
    where
        T: FromConfigValue + Default,
    {
        let settings = self.settings.read();
        let Some(raw) = tree::find(&settings.tree, key).filter(|v| !v.is_null()) else {
            debug!(name = %self.name, key, "config key not set, using fallback");
            return default.unwrap_or_default();
        };

        match T::from_config_value(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    name = %self.name,
                    key,
                    expected = T::TYPE_NAME,
                    error = %e,
                    "config value has the wrong type, using fallback"
                );
                default.unwrap_or_default()
            }
        }
    }

    /// Read `key` as `T`, reporting a missing key or a coercion failure
    pub fn try_get<T: FromConfigValue>(&self, key: &str) -> ConfigResult<T> {
        let settings = self.settings.read();
        let raw = tree::find(&settings.tree, key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        T::from_config_value(raw).map_err(|e| e.at(key))
    }

    /// Byte size at `key` (`"10MB"`, `"512kb"`, `1024`)
    ///
    /// `default` is used only when the key is not set at all; a set value
    /// that does not parse is 0.
    pub fn get_size_in_bytes(&self, key: &str, default: Option<u64>) -> u64 {
        if self.is_set(key) {
            coerce::parse_size_in_bytes(&self.get_string(key, None))
        } else {
            default.unwrap_or(0)
        }
    }

    /// Fallible form of [`Self::get_size_in_bytes`]
    pub fn try_get_size_in_bytes(&self, key: &str) -> ConfigResult<u64> {
        let raw: String = self.try_get(key)?;
        coerce::size_in_bytes(&raw).map_err(|e| e.at(key))
    }

    /// Deserialize the subtree at `key` into `T`
    pub fn unmarshal_key<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        let raw = tree::find(&self.settings.read().tree, key)
            .cloned()
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        serde_json::from_value(raw).map_err(|source| ConfigError::Unmarshal {
            key: key.to_string(),
            source,
        })
    }

    /// Deserialize the whole settings tree into `T`
    pub fn unmarshal<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        serde_json::from_value(Value::Object(self.all())).map_err(|source| ConfigError::Unmarshal {
            key: String::new(),
            source,
        })
    }
}

macro_rules! impl_instance_getters {
    ($($(#[$doc:meta])* $get:ident, $try_get:ident => $t:ty;)*) => {
        impl ConfigInstance {
            $(
                $(#[$doc])*
                ///
                /// Falls back to `default` (or the zero value) when the key is
                /// unset or holds something that cannot be converted.
                pub fn $get(&self, key: &str, default: Option<$t>) -> $t {
                    self.get_as(key, default)
                }

                #[doc = concat!("Fallible form of [`Self::", stringify!($get), "`]")]
                pub fn $try_get(&self, key: &str) -> ConfigResult<$t> {
                    self.try_get(key)
                }
            )*
        }
    };
}

with_typed_getters!(impl_instance_getters);

impl fmt::Debug for ConfigInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigInstance")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("format", &self.format)
            .field("loaded", &self.is_loaded())
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}
