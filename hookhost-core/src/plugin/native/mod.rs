//! Loading plugin shared libraries and resolving their hooks.
//!
//! A [`LibraryHandle`] owns one loaded library. Hooks are looked up by their
//! exact exported symbol name and come back as raw addresses tied to the
//! handle's lifetime:
//!
//! ```rust,ignore
//! use hookhost_core::plugin::native::LibraryHandle;
//!
//! let handle = LibraryHandle::open(&manifest.shared_lib_path())?;
//! if let Some(hook) = handle.resolve_hook("hookman_v4_friction_factor") {
//!     println!("{} at {:#x}", hook.name(), hook.address());
//! }
//! handle.close()?;
//! ```
//!
//! What an address points to is up to the host: the loader attaches no
//! signature or calling convention to it.

pub mod loader;
mod search_path;

pub use loader::{with_library, HookAddress, LibraryHandle};
