//! Plugin manager tying configuration, discovery and loading together.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::discovery::discover;
use super::manifest::PluginManifest;
use super::native::{with_library, LibraryHandle};
use crate::error::PluginError;
use crate::settings::HostConfig;

/// Manages the set of known plugins.
pub struct PluginManager {
    /// All discovered plugins, keyed by plugin name
    plugins: RwLock<HashMap<String, PluginManifest>>,
    config: HostConfig,
}

impl PluginManager {
    /// Creates a new PluginManager and discovers plugins.
    pub fn new(config: HostConfig) -> Self {
        let manager = Self {
            plugins: RwLock::new(HashMap::new()),
            config,
        };
        manager.reload();
        manager
    }

    /// Rediscovers all plugins from the configured directories.
    ///
    /// Manifests that fail validation are logged and skipped.
    pub fn reload(&self) {
        let mut plugins = HashMap::new();

        for manifest_path in discover(&self.config.plugin_dirs) {
            match PluginManifest::load(&manifest_path) {
                Ok(manifest) => {
                    let name = manifest.name().to_string();
                    if let Some(previous) = plugins.insert(name.clone(), manifest) {
                        debug!(
                            "Plugin '{}' at {:?} overridden by a later plugin directory",
                            name,
                            previous.manifest_path()
                        );
                    }
                }
                Err(e) => warn!("Skipping plugin manifest at {:?}: {}", manifest_path, e),
            }
        }

        for name in &self.config.disabled_plugins {
            if plugins.contains_key(name) {
                debug!("Plugin '{}' is disabled via config", name);
            }
        }

        info!("Loaded {} plugins", plugins.len());
        *self.write() = plugins;
    }

    /// Returns all plugin names, sorted.
    pub fn plugin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the names of plugins not disabled in config, sorted.
    pub fn enabled_plugin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .keys()
            .filter(|name| self.is_enabled(name))
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        !self.config.disabled_plugins.contains(name)
    }

    /// Returns a plugin's manifest.
    pub fn get(&self, name: &str) -> Option<PluginManifest> {
        self.read().get(name).cloned()
    }

    /// Returns every manifest, sorted by plugin name.
    pub fn manifests(&self) -> Vec<PluginManifest> {
        let mut manifests: Vec<PluginManifest> = self.read().values().cloned().collect();
        manifests.sort_by(|a, b| a.name().cmp(b.name()));
        manifests
    }

    /// Full symbol name of `hook` in the configured namespace.
    pub fn hook_symbol(&self, hook: &str) -> String {
        self.config.hooks.symbol_name(hook)
    }

    /// Loads an enabled plugin's shared library.
    pub fn open(&self, name: &str) -> Result<LibraryHandle, PluginError> {
        let manifest = self.enabled_manifest(name)?;
        LibraryHandle::open(&manifest.shared_lib_path())
    }

    /// Lists which of `hooks` the plugin implements.
    ///
    /// Hook names are short names, expanded with [`Self::hook_symbol`]. The
    /// library is loaded for the check and unloaded again before returning.
    pub fn implemented_hooks(
        &self,
        name: &str,
        hooks: &[&str],
    ) -> Result<Vec<String>, PluginError> {
        let manifest = self.enabled_manifest(name)?;

        with_library(&manifest.shared_lib_path(), |handle| {
            Ok(hooks
                .iter()
                .filter(|hook| handle.has_hook(&self.hook_symbol(hook)))
                .map(|hook| hook.to_string())
                .collect())
        })
    }

    fn enabled_manifest(&self, name: &str) -> Result<PluginManifest, PluginError> {
        match self.get(name) {
            Some(manifest) if self.is_enabled(name) => Ok(manifest),
            _ => Err(PluginError::PluginNotFound {
                file: name.to_string(),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, PluginManifest>> {
        self.plugins.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, PluginManifest>> {
        self.plugins.write().unwrap_or_else(PoisonError::into_inner)
    }
}
