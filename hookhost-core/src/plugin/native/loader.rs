//! Native library loading using libloading.

use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use tracing::{debug, info, warn};

use super::search_path;
use crate::error::PluginError;

/// A loaded plugin library.
///
/// The library stays loaded for as long as the handle lives. [`close`] or
/// dropping the handle unloads it, exactly once. Addresses returned by
/// [`resolve_hook`] borrow the handle, so none of them can outlive it:
///
/// ```compile_fail
/// use hookhost_core::LibraryHandle;
/// use std::path::Path;
///
/// let handle = LibraryHandle::open(Path::new("libfoo.so")).unwrap();
/// let hook = handle.resolve_hook("hookhost_v1_init");
/// handle.close().unwrap();
/// println!("{:?}", hook);
/// ```
///
/// [`close`]: LibraryHandle::close
/// [`resolve_hook`]: LibraryHandle::resolve_hook
pub struct LibraryHandle {
    library: Library,
    path: PathBuf,
}

impl LibraryHandle {
    /// Loads a shared library.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialization code inside this process.
    /// Only load plugins from trusted sources.
    pub fn open(library_path: &Path) -> Result<Self, PluginError> {
        debug!("Loading shared library from {:?}", library_path);

        let library = {
            let _search_path = search_path::for_library(library_path);
            unsafe { Library::new(library_path) }
        }
        .map_err(|source| PluginError::Load {
            path: library_path.to_path_buf(),
            source,
        })?;

        info!(path = %library_path.display(), "Shared library loaded");

        Ok(Self {
            library,
            path: library_path.to_path_buf(),
        })
    }

    /// Unloads the library and consumes the handle.
    pub fn close(self) -> Result<(), PluginError> {
        let Self { library, path } = self;

        library.close().map_err(|source| PluginError::Unload {
            path: path.clone(),
            source,
        })?;

        debug!("Unloaded shared library {:?}", path);
        Ok(())
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks up an exported symbol by its exact name.
    ///
    /// Missing symbols are a normal outcome and give `None`.
    pub fn resolve_hook(&self, hook_name: &str) -> Option<HookAddress<'_>> {
        // Only the symbol's address is read, never what it points to.
        let symbol = unsafe { self.library.get::<*const c_void>(hook_name.as_bytes()) };

        match symbol {
            Ok(symbol) if !symbol.is_null() => Some(HookAddress {
                name: hook_name.to_string(),
                address: *symbol as usize,
                _library: PhantomData,
            }),
            Ok(_) => None,
            Err(e) => {
                debug!("Hook '{}' not found in {:?}: {}", hook_name, self.path, e);
                None
            }
        }
    }

    /// Returns true if the library exports `hook_name`.
    pub fn has_hook(&self, hook_name: &str) -> bool {
        self.resolve_hook(hook_name).is_some()
    }

    /// Looks up a hook with a known type.
    ///
    /// # Safety
    ///
    /// `T` must match the exported symbol's real type and calling convention.
    pub unsafe fn hook<T>(&self, hook_name: &str) -> Option<Symbol<'_, T>> {
        self.library.get::<T>(hook_name.as_bytes()).ok()
    }
}

impl fmt::Debug for LibraryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryHandle")
            .field("path", &self.path)
            .finish()
    }
}

/// Address of a resolved hook, valid while its [`LibraryHandle`] is open.
///
/// The address carries no type information. Casting it to the right function
/// pointer type is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookAddress<'lib> {
    name: String,
    address: usize,
    _library: PhantomData<&'lib Library>,
}

impl<'lib> HookAddress<'lib> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bit pattern of the symbol's address.
    pub fn address(&self) -> usize {
        self.address
    }

    pub fn as_ptr(&self) -> *const c_void {
        self.address as *const c_void
    }
}

/// Opens a library, hands it to `f` and unloads it afterwards.
///
/// The library is unloaded on every exit path. An error from `f` is returned
/// even when unloading fails too, in which case the unload failure is only
/// logged.
pub fn with_library<T, E, F>(library_path: &Path, f: F) -> Result<T, E>
where
    F: FnOnce(&LibraryHandle) -> Result<T, E>,
    E: From<PluginError>,
{
    let handle = LibraryHandle::open(library_path)?;
    let result = f(&handle);

    match (result, handle.close()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("{}", close_err);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_library() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("libmissing.so");

        let err = LibraryHandle::open(&path).unwrap_err();
        match &err {
            PluginError::Load { path: failed, .. } => assert_eq!(failed, &path),
            other => panic!("expected load error, got {other:?}"),
        }
        assert!(err.to_string().contains("libmissing.so"));
    }

    #[test]
    fn test_open_invalid_binary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("libgarbage.so");
        fs::write(&path, "definitely not an ELF, PE or Mach-O file").unwrap();

        let err = LibraryHandle::open(&path).unwrap_err();
        assert!(matches!(err, PluginError::Load { .. }));
    }

    #[test]
    #[cfg(windows)]
    fn test_failed_open_restores_path() {
        let before = std::env::var_os("PATH");
        let temp = TempDir::new().unwrap();

        assert!(LibraryHandle::open(&temp.path().join("nothing.dll")).is_err());
        assert_eq!(std::env::var_os("PATH"), before);
    }

    #[test]
    fn test_with_library_propagates_open_error() {
        let temp = TempDir::new().unwrap();
        let result: Result<(), PluginError> =
            with_library(&temp.path().join("libmissing.so"), |_| Ok(()));
        assert!(matches!(result, Err(PluginError::Load { .. })));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    mod glibc {
        use super::*;

        // Already mapped into every test binary, so loading it is harmless.
        const LIBC: &str = "libc.so.6";

        #[test]
        fn test_resolve_exported_symbol() {
            let handle = LibraryHandle::open(Path::new(LIBC)).unwrap();

            let hook = handle.resolve_hook("malloc").unwrap();
            assert_eq!(hook.name(), "malloc");
            assert_ne!(hook.address(), 0);
            assert_eq!(hook.as_ptr() as usize, hook.address());
            assert!(handle.has_hook("strlen"));

            handle.close().unwrap();
        }

        #[test]
        fn test_missing_symbol_is_absent() {
            let handle = LibraryHandle::open(Path::new(LIBC)).unwrap();

            assert!(!handle.has_hook("nonexistent_symbol_x"));
            assert!(handle.resolve_hook("nonexistent_symbol_x").is_none());
            assert!(handle.resolve_hook("MALLOC").is_none());
            assert!(handle.resolve_hook("mall").is_none());
            assert!(handle.resolve_hook("mal\0loc").is_none());
        }

        #[test]
        fn test_typed_hook() {
            let handle = LibraryHandle::open(Path::new(LIBC)).unwrap();
            let strlen = unsafe {
                handle
                    .hook::<unsafe extern "C" fn(*const std::ffi::c_char) -> usize>("strlen")
                    .unwrap()
            };
            assert_eq!(unsafe { strlen(c"hook".as_ptr()) }, 4);
        }

        #[test]
        fn test_with_library_keeps_primary_error() {
            let result: Result<(), PluginError> = with_library(Path::new(LIBC), |handle| {
                assert!(handle.has_hook("malloc"));
                Err(PluginError::Validation("hook rejected input".to_string()))
            });
            assert!(matches!(result, Err(PluginError::Validation(_))));

            let address = with_library::<_, PluginError, _>(Path::new(LIBC), |handle| {
                Ok(handle.resolve_hook("free").map(|hook| hook.address()))
            })
            .unwrap();
            assert!(address.is_some());
        }
    }
}
