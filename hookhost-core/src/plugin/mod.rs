//! Native plugin support.
//!
//! A plugin is a directory holding a `plugin.yaml` manifest next to a compiled
//! shared library:
//!
//! ```text
//! plugins/
//!   friction/
//!     plugin.yaml      # plugin_name, plugin_version, author, email, shared_lib
//!     libfriction.so   # derived from `shared_lib: friction`
//!     readme.md        # optional, becomes the plugin description
//! ```
//!
//! ## Flow
//!
//! 1. [`discover`] finds every `plugin.yaml` below a set of roots
//! 2. [`PluginManifest::load`] validates the manifest and derives the library path
//! 3. [`LibraryHandle::open`] loads the library
//! 4. [`LibraryHandle::resolve_hook`] looks hooks up by their full symbol name
//! 5. [`LibraryHandle::close`] (or dropping the handle) unloads it
//!
//! **Security Note**: plugin libraries run with full access to the host
//! process. Only load plugins from trusted sources.

pub mod discovery;
pub mod hooks;
pub mod manager;
pub mod manifest;
pub mod native;
pub mod package;
pub mod platform;

pub use discovery::{discover, MANIFEST_FILE_NAME};
pub use hooks::HookNamespace;
pub use manager::PluginManager;
pub use manifest::PluginManifest;
pub use native::{with_library, HookAddress, LibraryHandle};
pub use package::{validate_archive, validate_package};
pub use platform::Platform;
