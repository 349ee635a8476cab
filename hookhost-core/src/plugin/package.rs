//! Validation of packaged (archived) plugins.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use super::discovery::MANIFEST_FILE_NAME;
use super::manifest::ManifestSchema;
use super::platform::Platform;
use crate::error::PluginError;

/// Checks that a package ships the library its manifest declares.
///
/// This only matches names: the library binary itself is never opened.
pub fn validate_package<S: AsRef<str>>(
    file_list: &[S],
    manifest_text: &str,
    platform: Platform,
) -> Result<(), PluginError> {
    let schema = ManifestSchema::parse(manifest_text)?;
    let library = schema.library_filename(platform);

    if file_list.iter().any(|entry| entry.as_ref() == library) {
        Ok(())
    } else {
        Err(PluginError::PluginNotFound { file: library })
    }
}

/// Runs [`validate_package`] against a zip archive on disk.
pub fn validate_archive(path: &Path, platform: Platform) -> Result<(), PluginError> {
    let file = File::open(path).map_err(|e| PluginError::io(path, e))?;
    let mut archive = ZipArchive::new(file)?;

    let file_list: Vec<String> = archive.file_names().map(str::to_string).collect();
    debug!("Validating plugin archive {:?} ({} entries)", path, file_list.len());

    let mut manifest_text = String::new();
    match archive.by_name(MANIFEST_FILE_NAME) {
        Ok(mut entry) => {
            entry
                .read_to_string(&mut manifest_text)
                .map_err(|e| PluginError::io(path, e))?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(PluginError::PluginNotFound {
                file: MANIFEST_FILE_NAME.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    validate_package(&file_list, &manifest_text, platform)
}
