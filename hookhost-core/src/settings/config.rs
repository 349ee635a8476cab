use crate::plugin::hooks::HookNamespace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Host side plugin settings, usually read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Roots searched recursively for `plugin.yaml`. Later roots win when two
    /// plugins share a name.
    #[serde(default)]
    pub plugin_dirs: Vec<PathBuf>,

    /// Plugin names that are discovered but never loaded.
    #[serde(default)]
    pub disabled_plugins: HashSet<String>,

    /// Namespace used to build hook symbol names.
    #[serde(default)]
    pub hooks: HookNamespace,
}

impl HostConfig {
    /// Load settings from a TOML file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read host config from {path:?}"))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse host config {path:?}"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save settings as pretty TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize host config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write host config to {path:?}"))
    }
}
