use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info, warn};

use super::metadata::{read_metadata, write_metadata};
use super::opener::FolderOpener;
use super::tree::{remove_tree, resolve_item_dir};
use super::types::{ItemMetadata, LocalItem, OperationStatus};
use super::LibraryError;
use crate::catalog::{is_published_file_id, WorkshopCatalog};
use crate::paths::{InstallationContext, PathError, PathResolver};

/// The directory tree of acquired items.
///
/// Nothing is cached: every call re-resolves the content root and re-reads the
/// directory, so manual changes on disk show up immediately.
pub struct LocalLibrary {
    resolver: Arc<PathResolver>,
    catalog: Arc<dyn WorkshopCatalog>,
    opener: Arc<dyn FolderOpener>,
}

impl LocalLibrary {
    pub fn new(
        resolver: Arc<PathResolver>,
        catalog: Arc<dyn WorkshopCatalog>,
        opener: Arc<dyn FolderOpener>,
    ) -> Self {
        Self {
            resolver,
            catalog,
            opener,
        }
    }

    async fn context(&self) -> Result<InstallationContext, LibraryError> {
        self.resolver.resolve_context().await.map_err(|e| match e {
            PathError::NotFound { product } => LibraryError::RootNotFound { product },
            PathError::CreateFailed { path, source } => {
                LibraryError::RootUnavailable { path, source }
            }
        })
    }

    /// Every item directory, sorted by name. Empty when the content root
    /// cannot be resolved.
    pub async fn list(&self) -> Vec<LocalItem> {
        match self.try_list().await {
            Ok(items) => items,
            Err(e) => {
                debug!("Listing unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_list(&self) -> Result<Vec<LocalItem>, LibraryError> {
        let context = self.context().await?;
        let mut dirs = item_dirs(&context.content_root).await?;
        dirs.sort();

        let mut items = Vec::with_capacity(dirs.len());
        for (name, path) in dirs {
            let metadata = self.load_metadata(&name, &path).await;
            items.push(LocalItem {
                metadata,
                path_short: context.display_path(&path),
                path,
            });
        }

        debug!("Listed {} local items", items.len());
        Ok(items)
    }

    /// Placeholder merged with `meta.json`, or with a freshly fetched record
    /// that is then persisted.
    async fn load_metadata(&self, name: &str, dir: &Path) -> ItemMetadata {
        let mut metadata = ItemMetadata::placeholder(name, self.catalog.detail_url(name));

        match read_metadata(dir).await {
            Ok(Some(object)) => {
                metadata.merge_object(object);
                return metadata;
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Ignoring unreadable metadata in {}: {}", dir.display(), e);
                return metadata;
            }
        }

        // Folders that are not published items (local projects) stay as-is
        if !is_published_file_id(name) {
            return metadata;
        }

        match self.catalog.fetch_item(name).await {
            Ok(item) => {
                metadata.merge_catalog(item);
                if let Err(e) = write_metadata(dir, &metadata).await {
                    warn!("Failed to persist metadata for {}: {}", name, e);
                }
            }
            Err(e) => debug!("Metadata fetch for {} failed: {}", name, e),
        }

        metadata
    }

    /// Remove an item directory. Reports `false` on any refusal or when any
    /// entry could not be removed.
    pub async fn delete(&self, item_id: &str) -> bool {
        match self.try_delete(item_id).await {
            Ok(path) => {
                info!("Deleted {}", path.display());
                true
            }
            Err(e) => {
                warn!("Delete of {:?} failed: {}", item_id, e);
                false
            }
        }
    }

    async fn try_delete(&self, item_id: &str) -> Result<PathBuf, LibraryError> {
        let context = self.context().await?;
        let dir = resolve_item_dir(&context.content_root, item_id).await?;
        if !dir.is_dir() {
            return Err(LibraryError::ItemNotFound { path: dir });
        }
        remove_tree(&dir).await?;
        Ok(dir)
    }

    /// Show an item directory in the host file browser.
    pub async fn reveal(&self, item_id: &str) -> OperationStatus {
        match self.try_reveal(item_id).await {
            Ok(()) => OperationStatus::ok("Folder opened"),
            Err(e) => OperationStatus::failed(e.to_string()),
        }
    }

    async fn try_reveal(&self, item_id: &str) -> Result<(), LibraryError> {
        let context = self.context().await?;
        let dir = resolve_item_dir(&context.content_root, item_id).await?;
        if !dir.is_dir() {
            return Err(LibraryError::ItemNotFound { path: dir });
        }
        debug!("Opening {}", dir.display());
        self.opener.open(&dir).map_err(LibraryError::OpenFailed)
    }
}

/// `(name, path)` of every directory directly below `root`. Symlinks are
/// skipped, so listing never reads or writes outside the root.
async fn item_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>, LibraryError> {
    let mut entries = match fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LibraryError::Io(e)),
    };

    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        // file_type() does not follow symlinks
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            dirs.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
        } else {
            debug!("Skipping non-directory entry {}", entry.path().display());
        }
    }
    Ok(dirs)
}
