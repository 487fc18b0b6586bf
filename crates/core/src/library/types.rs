//! Types for locally cached items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::catalog::CatalogItem;

/// Keys recomputed on every listing and never taken from disk.
const PATH_KEYS: [&str; 2] = ["path", "pathShort"];

/// Metadata stored next to an acquired item.
///
/// Unknown keys found on disk are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub rating: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemMetadata {
    /// Record shown for an item before anything is known about it.
    pub fn placeholder(id: &str, link: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Workshop {}", id),
            link: link.into(),
            ..Default::default()
        }
    }

    /// Overlay the keys present in `object`.
    ///
    /// Known fields only take string values; anything else for a known key is
    /// ignored. Path keys are dropped.
    pub fn merge_object(&mut self, object: Map<String, Value>) {
        for (key, value) in object {
            if PATH_KEYS.contains(&key.as_str()) {
                continue;
            }
            let slot = match key.as_str() {
                "id" => Some(&mut self.id),
                "title" => Some(&mut self.title),
                "author" => Some(&mut self.author),
                "img" => Some(&mut self.img),
                "link" => Some(&mut self.link),
                "rating" => Some(&mut self.rating),
                _ => None,
            };
            match (slot, value) {
                (Some(slot), Value::String(s)) => *slot = s,
                (Some(_), _) => {}
                (None, value) => {
                    self.extra.insert(key, value);
                }
            }
        }
    }

    /// Overlay a freshly fetched catalog record.
    pub fn merge_catalog(&mut self, item: CatalogItem) {
        self.id = item.id;
        self.title = item.title;
        self.author = item.author;
        self.img = item.preview_image_url;
        self.link = item.detail_url;
        self.rating = item.rating_stars;
        if let Some(rating_img) = item.rating_img {
            self.extra
                .insert("rating_img".to_string(), Value::String(rating_img));
        }
    }
}

impl From<CatalogItem> for ItemMetadata {
    fn from(item: CatalogItem) -> Self {
        let mut metadata = ItemMetadata::default();
        metadata.merge_catalog(item);
        metadata
    }
}

/// A cached item as returned by a listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalItem {
    #[serde(flatten)]
    pub metadata: ItemMetadata,
    /// Absolute directory of the item.
    pub path: PathBuf,
    /// Directory relative to the install root with a leading separator.
    #[serde(rename = "pathShort")]
    pub path_short: String,
}

/// Success flag plus a short user-facing message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationStatus {
    pub success: bool,
    pub message: String,
}

impl OperationStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
