use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A directory tree of plugins built inside a temp dir.
pub struct PluginTree {
    pub root: TempDir,
}

impl PluginTree {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Writes `<rel_dir>/plugin.yaml` declaring `shared_lib: <name>`.
    pub fn add_manifest(&self, rel_dir: &str, name: &str) -> PathBuf {
        let dir = self.root.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        let manifest = format!(
            "plugin_name: {name}\nplugin_version: \"1.0\"\nauthor: Test Author\nemail: test@example.com\nshared_lib: {name}\n"
        );
        let path = dir.join("plugin.yaml");
        fs::write(&path, manifest).unwrap();
        path
    }
}
