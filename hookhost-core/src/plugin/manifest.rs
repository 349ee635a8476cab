//! Plugin manifest (`plugin.yaml`) parsing and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::platform::Platform;
use crate::error::PluginError;

/// Optional file next to the manifest whose content becomes the description.
pub const DESCRIPTION_FILE_NAME: &str = "readme.md";

/// Description used when the plugin ships no `readme.md`.
pub const DEFAULT_DESCRIPTION: &str = "Could not find a description";

/// Raw `plugin.yaml` content. Every key is required and no other key is accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ManifestSchema {
    pub plugin_name: String,
    pub plugin_version: String,
    pub author: String,
    pub email: String,
    pub shared_lib: String,
}

impl ManifestSchema {
    /// Validates manifest text without touching the filesystem.
    pub(crate) fn parse(text: &str) -> Result<Self, PluginError> {
        let schema: Self = serde_yaml::from_str(text)?;

        let fields = [
            ("plugin_name", &schema.plugin_name),
            ("plugin_version", &schema.plugin_version),
            ("author", &schema.author),
            ("email", &schema.email),
            ("shared_lib", &schema.shared_lib),
        ];
        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(PluginError::Validation(format!("`{key}` must not be empty")));
            }
        }

        // The library must sit next to the manifest.
        let lib = schema.shared_lib.as_str();
        if lib.contains(['/', '\\']) || lib == "." || lib == ".." {
            return Err(PluginError::Validation(format!(
                "`shared_lib` must be a bare library name, got '{lib}'"
            )));
        }

        Ok(schema)
    }

    /// Library filename for the given platform.
    pub(crate) fn library_filename(&self, platform: Platform) -> String {
        platform.library_filename(&self.shared_lib)
    }
}

/// Validated, immutable description of one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginManifest {
    name: String,
    version: String,
    author: String,
    email: String,
    shared_lib: String,
    shared_lib_name: String,
    manifest_path: PathBuf,
    description: String,
}

impl PluginManifest {
    /// Reads and parses a manifest for the current platform.
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        let content = std::fs::read_to_string(path).map_err(|e| PluginError::io(path, e))?;
        Self::parse(&content, path, Platform::current())
    }

    /// Parses manifest text that was read from `manifest_path`.
    ///
    /// The schema is checked before anything on disk is consulted. The only
    /// file read afterwards is the optional `readme.md` beside the manifest.
    pub fn parse(
        text: &str,
        manifest_path: &Path,
        platform: Platform,
    ) -> Result<Self, PluginError> {
        let schema = ManifestSchema::parse(text)?;
        let shared_lib_name = schema.library_filename(platform);

        let readme = manifest_path
            .parent()
            .map(|dir| dir.join(DESCRIPTION_FILE_NAME))
            .filter(|readme| readme.exists());
        let description = match readme {
            Some(readme) => {
                std::fs::read_to_string(&readme).map_err(|e| PluginError::io(&readme, e))?
            }
            None => DEFAULT_DESCRIPTION.to_string(),
        };

        debug!(
            "Parsed manifest for plugin '{}' v{} ({})",
            schema.plugin_name, schema.plugin_version, shared_lib_name
        );

        Ok(Self {
            name: schema.plugin_name,
            version: schema.plugin_version,
            author: schema.author,
            email: schema.email,
            shared_lib: schema.shared_lib,
            shared_lib_name,
            manifest_path: manifest_path.to_path_buf(),
            description,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Platform independent library name as written in the manifest.
    pub fn shared_lib(&self) -> &str {
        &self.shared_lib
    }

    /// Library filename for the platform the manifest was parsed for.
    pub fn shared_lib_name(&self) -> &str {
        &self.shared_lib_name
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Directory that holds the manifest and the library.
    pub fn root_path(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Full path of the shared library next to the manifest.
    pub fn shared_lib_path(&self) -> PathBuf {
        self.root_path().join(&self.shared_lib_name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
