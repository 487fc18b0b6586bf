//! `meta.json` persistence.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;

use super::types::ItemMetadata;
use super::LibraryError;

/// Metadata file name inside each item directory.
pub const METADATA_FILE: &str = "meta.json";

pub fn metadata_path(item_dir: &Path) -> PathBuf {
    item_dir.join(METADATA_FILE)
}

/// Read the raw metadata object of an item.
///
/// `Ok(None)` when the file does not exist. A file that is not a JSON object
/// is an error.
pub async fn read_metadata(item_dir: &Path) -> Result<Option<Map<String, Value>>, LibraryError> {
    let path = metadata_path(item_dir);
    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LibraryError::Io(e)),
    };

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(object) => Ok(Some(object)),
        _ => Err(LibraryError::InvalidMetadata { path }),
    }
}

/// Persist `metadata` as pretty-printed JSON.
///
/// Written to a sibling temp file first and renamed into place, so readers
/// never observe a half-written file.
pub async fn write_metadata(item_dir: &Path, metadata: &ItemMetadata) -> Result<(), LibraryError> {
    let path = metadata_path(item_dir);
    let temp = item_dir.join(format!("{}.tmp", METADATA_FILE));

    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(&temp, json.as_bytes()).await?;
    if let Err(e) = fs::rename(&temp, &path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(LibraryError::Io(e));
    }
    Ok(())
}
