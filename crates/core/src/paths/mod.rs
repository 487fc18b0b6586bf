//! Installation discovery.
//!
//! Locates the product installation on the host and the content directory
//! below it, using an ordered chain of discovery strategies:
//!
//! 1. an explicit `install_dir` from configuration,
//! 2. the product's own registry value,
//! 3. the package manager root from the registry plus the app manifest,
//! 4. conventional package manager roots plus the app manifest.
//!
//! Nothing is cached; every call re-runs the chain so a moved installation is
//! picked up on the next request.

mod manifest;
mod registry;
mod resolver;

pub use manifest::{manifest_file_name, parse_install_dir};
pub use registry::{parse_reg_query_output, NoRegistry, RegQuerySource, RegistrySource};
pub use resolver::PathResolver;

use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;

/// Errors raised while resolving installation paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// No discovery strategy produced an existing directory.
    #[error("{product} installation not found")]
    NotFound { product: String },

    /// The content directory could not be created.
    #[error("Failed to create content directory {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Install root and content root, recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationContext {
    pub install_root: PathBuf,
    pub content_root: PathBuf,
}

impl InstallationContext {
    /// Path of `path` relative to the install root, rendered with a leading
    /// separator (`\projects\myprojects\123` on Windows).
    ///
    /// Falls back to the full path when `path` is not below the install root.
    pub fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.install_root) {
            Ok(relative) => {
                let joined = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(&MAIN_SEPARATOR.to_string());
                format!("{}{}", MAIN_SEPARATOR, joined)
            }
            Err(_) => path.display().to_string(),
        }
    }
}
