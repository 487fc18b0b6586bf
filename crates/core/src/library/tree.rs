//! Containment checks and recursive removal of item directories.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::LibraryError;

/// Resolve the directory of `item_id` below `root`.
///
/// `item_id` must be a single plain path component. Both paths are
/// canonicalized and the candidate must be a strict descendant of the root,
/// so symlinks pointing outside the root are refused as well.
pub async fn resolve_item_dir(root: &Path, item_id: &str) -> Result<PathBuf, LibraryError> {
    let mut components = Path::new(item_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => {
            return Err(LibraryError::ContainmentViolation {
                path: root.join(item_id),
            })
        }
    }

    let root = fs::canonicalize(root)
        .await
        .map_err(|source| LibraryError::RootUnavailable {
            path: root.to_path_buf(),
            source,
        })?;

    let joined = root.join(item_id);
    let candidate = match fs::canonicalize(&joined).await {
        Ok(path) => path,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LibraryError::ItemNotFound { path: joined })
        }
        Err(e) => return Err(LibraryError::Io(e)),
    };

    if candidate == root || !candidate.starts_with(&root) {
        warn!(
            "Refusing {} outside of {}",
            candidate.display(),
            root.display()
        );
        return Err(LibraryError::ContainmentViolation { path: candidate });
    }

    Ok(candidate)
}

/// Filesystem removals used by [`remove_tree`].
#[async_trait]
trait Remover: Sync {
    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
    async fn remove_file(&self, path: &Path) -> io::Result<()>;
    async fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

struct TokioRemover;

#[async_trait]
impl Remover for TokioRemover {
    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path).await
    }
}

/// Remove the directory `path` and everything below it.
///
/// When a plain recursive removal fails, every remaining entry is still
/// attempted and the number of entries that could not be removed is reported.
pub async fn remove_tree(path: &Path) -> Result<(), LibraryError> {
    remove_tree_with(path, &TokioRemover).await
}

async fn remove_tree_with(path: &Path, remover: &dyn Remover) -> Result<(), LibraryError> {
    match remover.remove_dir_all(path).await {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => debug!("remove_dir_all {} failed: {}, walking", path.display(), e),
    }

    let mut errors = Vec::new();
    let mut dirs = vec![path.to_path_buf()];
    let mut pending = vec![path.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                errors.push(format!("Failed to read directory {}: {}", dir.display(), e));
                continue;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    errors.push(format!("Failed to read directory {}: {}", dir.display(), e));
                    break;
                }
            };

            let entry_path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => {
                    dirs.push(entry_path.clone());
                    pending.push(entry_path);
                }
                Ok(_) => {
                    if let Err(e) = remover.remove_file(&entry_path).await {
                        errors.push(format!("Failed to remove {}: {}", entry_path.display(), e));
                    }
                }
                Err(e) => {
                    errors.push(format!("Failed to stat {}: {}", entry_path.display(), e));
                }
            }
        }
    }

    // Parents are always recorded before their children
    for dir in dirs.iter().rev() {
        if let Err(e) = remover.remove_dir(dir).await {
            errors.push(format!("Failed to remove directory {}: {}", dir.display(), e));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    for error in &errors {
        warn!("{}", error);
    }
    Err(LibraryError::RemovalIncomplete {
        path: path.to_path_buf(),
        failures: errors.len(),
    })
}
