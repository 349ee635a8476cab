//! Temporary loader search path fix-up.
//!
//! The Windows loader does not look in a library's own directory when it
//! resolves that library's dependencies, it searches `PATH`. While a plugin is
//! being loaded its directory is put in front of `PATH`, and the original
//! value is put back as soon as the load returns. Other platforms resolve
//! dependencies relative to the library and need no help.

use std::ffi::OsString;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Serializes every mutate-load-restore sequence in the process.
static SEARCH_PATH_LOCK: Mutex<()> = Mutex::new(());

/// Prepends a directory to a search path variable until dropped.
pub(crate) struct SearchPathGuard {
    var: &'static str,
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl SearchPathGuard {
    pub(crate) fn prepend(var: &'static str, dir: &Path) -> Self {
        let lock = SEARCH_PATH_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = std::env::var_os(var);
        let mut paths = vec![dir.to_path_buf()];
        if let Some(previous) = &previous {
            paths.extend(std::env::split_paths(previous));
        }

        match std::env::join_paths(paths) {
            Ok(joined) => {
                debug!("Prepending {:?} to {}", dir, var);
                std::env::set_var(var, joined);
            }
            Err(e) => warn!("Leaving {} untouched, cannot add {:?}: {}", var, dir, e),
        }

        Self {
            var,
            previous,
            _lock: lock,
        }
    }
}

impl Drop for SearchPathGuard {
    fn drop(&mut self) {
        // Runs before `_lock` is released.
        match &self.previous {
            Some(previous) => std::env::set_var(self.var, previous),
            None => std::env::remove_var(self.var),
        }
    }
}

/// Returns the guard needed while loading `library_path` on this platform.
pub(crate) fn for_library(library_path: &Path) -> Option<SearchPathGuard> {
    if !cfg!(windows) {
        return None;
    }

    library_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| SearchPathGuard::prepend("PATH", dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_prepend_and_restore() {
        const VAR: &str = "HOOKHOST_TEST_PREPEND_PATH";
        let original = std::env::join_paths([PathBuf::from("first"), PathBuf::from("second")])
            .unwrap();
        std::env::set_var(VAR, &original);

        {
            let _guard = SearchPathGuard::prepend(VAR, Path::new("plugin_dir"));
            let current = std::env::var_os(VAR).unwrap();
            let paths: Vec<PathBuf> = std::env::split_paths(&current).collect();
            assert_eq!(
                paths,
                vec![
                    PathBuf::from("plugin_dir"),
                    PathBuf::from("first"),
                    PathBuf::from("second")
                ]
            );
        }

        assert_eq!(std::env::var_os(VAR), Some(original));
        std::env::remove_var(VAR);
    }

    #[test]
    fn test_unset_variable_is_removed_again() {
        const VAR: &str = "HOOKHOST_TEST_UNSET_PATH";
        std::env::remove_var(VAR);

        {
            let _guard = SearchPathGuard::prepend(VAR, Path::new("plugin_dir"));
            assert_eq!(std::env::var_os(VAR), Some(OsString::from("plugin_dir")));
        }

        assert_eq!(std::env::var_os(VAR), None);
    }

    #[test]
    fn test_restored_on_panic() {
        const VAR: &str = "HOOKHOST_TEST_PANIC_PATH";
        std::env::set_var(VAR, "original");

        let result = std::panic::catch_unwind(|| {
            let _guard = SearchPathGuard::prepend(VAR, Path::new("plugin_dir"));
            panic!("load blew up");
        });

        assert!(result.is_err());
        assert_eq!(std::env::var_os(VAR), Some(OsString::from("original")));
        std::env::remove_var(VAR);
    }

    #[test]
    fn test_only_windows_needs_a_guard() {
        let guard = for_library(Path::new("plugins").join("libfoo.so").as_path());
        assert_eq!(guard.is_some(), cfg!(windows));
        assert!(for_library(Path::new("foo.dll")).is_none());
    }
}
