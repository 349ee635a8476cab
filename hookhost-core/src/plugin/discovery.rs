//! Plugin manifest discovery from the filesystem.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name every plugin manifest must have.
pub const MANIFEST_FILE_NAME: &str = "plugin.yaml";

/// Finds every `plugin.yaml` below the given roots, at any depth.
///
/// Roots are searched in the order given and each directory level is walked in
/// file name order, so the result is stable for an unchanged tree. Roots that
/// do not exist yield nothing.
pub fn discover<P: AsRef<Path>>(roots: &[P]) -> Vec<PathBuf> {
    let mut manifests = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if !root.is_dir() {
            debug!("Skipping plugin root {:?}: not a directory", root);
            continue;
        }

        debug!("Discovering plugins from {:?}", root);
        manifests.extend(discover_in(root));
    }

    debug!("Discovered {} plugin manifests", manifests.len());
    manifests
}

fn discover_in(root: &Path) -> Vec<PathBuf> {
    let mut manifests = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read entry under {:?}: {}", root, e);
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME {
            manifests.push(entry.into_path());
        }
    }

    manifests
}
