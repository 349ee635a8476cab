//! Hook symbol naming.
//!
//! Plugins export hooks under fully-qualified C symbol names of the form
//! `{project}_v{version}_{hook}`, for example `hookman_v4_friction_factor`.
//! The loader never checks this convention; it resolves whatever name it is
//! given.

use serde::{Deserialize, Serialize};

/// Project name and hook API version shared by every hook of a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookNamespace {
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_project() -> String {
    "hookhost".to_string()
}

fn default_version() -> u32 {
    1
}

impl Default for HookNamespace {
    fn default() -> Self {
        Self {
            project: default_project(),
            version: default_version(),
        }
    }
}

impl HookNamespace {
    pub fn new(project: impl Into<String>, version: u32) -> Self {
        Self {
            project: project.into(),
            version,
        }
    }

    /// Full symbol name of `hook` inside this namespace.
    pub fn symbol_name(&self, hook: &str) -> String {
        format!("{}_v{}_{}", self.project, self.version, hook)
    }
}
