//! Platform-specific shared library naming.

/// Operating system family a plugin library is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    Macos,
}

impl Platform {
    /// Returns the platform this binary was compiled for.
    ///
    /// Every unix that is not macOS uses the linux naming rule.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }

    /// Builds the on-disk library filename for a platform independent base name.
    pub fn library_filename(self, base_name: &str) -> String {
        match self {
            Platform::Windows => format!("{base_name}.dll"),
            Platform::Linux => format!("lib{base_name}.so"),
            Platform::Macos => format!("lib{base_name}.dylib"),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
