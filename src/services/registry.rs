//! Name → instance registry with lazy, single-flight loading

use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

use super::instance::ConfigInstance;
use crate::domain::errors::{ConfigError, ConfigResult};
use crate::domain::models::RegistryOptions;
use crate::infrastructure::config::ConfigLoader;

/// Registry of loaded configuration instances, keyed by logical name
///
/// Instances are loaded on first use and kept for the life of the registry.
/// Looking up an unseen name holds that name's map entry while the file is
/// loaded, so concurrent first lookups produce a single instance (and a
/// single watcher).
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    options: RegistryOptions,
    instances: DashMap<String, Arc<ConfigInstance>>,
}

impl ConfigRegistry {
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            options,
            instances: DashMap::new(),
        }
    }

    pub const fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Instance registered under `name`, loading
    /// `<config_path>/<name>.<config_type>` the first time it is asked for
    ///
    /// A file that fails to load still occupies the name, so it is not
    /// re-read on every lookup; use [`Self::reload`] to retry.
    pub fn use_name(&self, name: &str) -> Arc<ConfigInstance> {
        if let Some(existing) = self.instances.get(name) {
            return Arc::clone(existing.value());
        }

        let path = self.options.path_for(name);
        let entry = self
            .instances
            .entry(name.to_string())
            .or_insert_with(|| self.open(name, &path));
        Arc::clone(entry.value())
    }

    /// Instance registered under the configured default name
    pub fn default_instance(&self) -> Arc<ConfigInstance> {
        self.use_name(&self.options.default_name)
    }

    /// Load `path` and register it under its file stem, replacing any
    /// instance already registered under that name
    ///
    /// Load failures are logged; the returned instance is then empty.
    pub fn read(&self, path: impl AsRef<Path>) -> Arc<ConfigInstance> {
        let path = path.as_ref();
        let name = name_of(path);
        let instance = self.open(&name, path);
        self.instances.insert(name, Arc::clone(&instance));
        instance
    }

    /// Load `path` and register it under its file stem, or report why it
    /// could not be loaded
    ///
    /// Nothing is registered on failure.
    pub fn try_read(&self, path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigInstance>> {
        let path = path.as_ref();
        let name = name_of(path);
        let format = ConfigLoader::detect_format(path, &self.options.config_type)?;
        let instance = Arc::new(ConfigInstance::try_open(
            name.as_str(),
            path,
            format,
            self.options.env_prefix.clone(),
        )?);
        if self.options.watch {
            instance.watch()?;
        }
        self.instances.insert(name, Arc::clone(&instance));
        Ok(instance)
    }

    /// Add an instance built elsewhere, e.g. with [`ConfigInstance::from_value`]
    pub fn register(&self, instance: ConfigInstance) -> Arc<ConfigInstance> {
        let instance = Arc::new(instance);
        self.instances
            .insert(instance.name().to_string(), Arc::clone(&instance));
        instance
    }

    /// Re-read the file behind `name`
    pub fn reload(&self, name: &str) -> ConfigResult<()> {
        let instance = self
            .instances
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ConfigError::UnknownInstance(name.to_string()))?;
        instance.reload()?;
        if self.options.watch && !instance.is_watching() {
            instance.watch()?;
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Drop `name` from the registry
    ///
    /// Its watcher stops once callers release their handles.
    pub fn remove(&self, name: &str) -> Option<Arc<ConfigInstance>> {
        self.instances.remove(name).map(|(_, instance)| instance)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Build (but do not register) the instance for `path`
    fn open(&self, name: &str, path: &Path) -> Arc<ConfigInstance> {
        debug!(name, path = %path.display(), "loading config");
        let instance = match ConfigLoader::detect_format(path, &self.options.config_type) {
            Ok(format) => {
                ConfigInstance::open(name, path, format, self.options.env_prefix.clone())
            }
            Err(e) => {
                error!(name, path = %path.display(), error = %e, "config file read failed");
                ConfigInstance::unloaded(name, path, &e)
            }
        };
        let instance = Arc::new(instance);

        if self.options.watch && instance.is_loaded() {
            if let Err(e) = instance.watch() {
                error!(name, path = %path.display(), error = %e, "config file watch failed");
            }
        }
        instance
    }
}

/// Logical name for a config file: its base name without extension
fn name_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
