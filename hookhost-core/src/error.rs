use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating, packaging or loading a plugin.
///
/// A missing hook is not an error: lookups return `None` instead.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Invalid plugin manifest: {0}")]
    Validation(String),

    #[error("{file} could not be found inside the plugin")]
    PluginNotFound { file: String },

    #[error("Failed to load shared library {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Failed to unload shared library {}: {source}", .path.display())]
    Unload {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid plugin archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl PluginError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_yaml::Error> for PluginError {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Validation(source.to_string())
    }
}
