//! Local cache of acquired items.
//!
//! Each item lives in its own directory below the content root, named by its
//! id, with an optional `meta.json` describing it. This module lists those
//! directories (enriching missing metadata from the catalog), deletes them
//! behind a containment check, and reveals them in the host file browser.

mod manager;
mod metadata;
mod opener;
mod tree;
mod types;

pub use manager::LocalLibrary;
pub use metadata::{metadata_path, read_metadata, write_metadata, METADATA_FILE};
pub use opener::{FolderOpener, SystemOpener};
pub use tree::{remove_tree, resolve_item_dir};
pub use types::{ItemMetadata, LocalItem, OperationStatus};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by local library operations. `Display` is user-facing.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{product} folder not found")]
    RootNotFound { product: String },

    #[error("Content directory {path} unavailable: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested path escapes the content root.
    #[error("Invalid path")]
    ContainmentViolation { path: PathBuf },

    #[error("Folder not found")]
    ItemNotFound { path: PathBuf },

    #[error("Could not remove {failures} entries below {path}")]
    RemovalIncomplete { path: PathBuf, failures: usize },

    #[error("Metadata in {path} is not a JSON object")]
    InvalidMetadata { path: PathBuf },

    #[error("{0}")]
    OpenFailed(#[source] std::io::Error),

    #[error("Invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
