pub mod error;
pub mod plugin;
pub mod settings;

// Public library API - hosts embedding the loader should only need these.
pub use error::PluginError;
pub use plugin::{
    discover, validate_archive, validate_package, with_library, HookAddress, HookNamespace,
    LibraryHandle, Platform, PluginManager, PluginManifest,
};
pub use settings::HostConfig;
