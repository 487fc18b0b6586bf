//! Remote workshop catalog.
//!
//! This module provides the `WorkshopCatalog` trait used by acquisition and
//! the local library to look up item metadata, plus the community-site
//! implementation that scrapes browse and detail pages.

mod parse;
mod steam;
mod types;

pub use parse::{dedup_by_id, parse_item_page, parse_search_page, rating_to_stars, UNKNOWN_AUTHOR};
pub use steam::SteamWorkshopClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status} for {url}")]
    ApiError { status: u16, url: String },

    /// Client could not be constructed from configuration.
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Lookup of remote catalog items.
#[async_trait]
pub trait WorkshopCatalog: Send + Sync {
    /// Detail page URL for an item id.
    fn detail_url(&self, id: &str) -> String;

    /// Fetch a single item's detail page.
    ///
    /// Missing fields degrade to defaults; only transport failures and
    /// non-success statuses are errors.
    async fn fetch_item(&self, id: &str) -> Result<CatalogItem, CatalogError>;

    /// Fetch one browse/search page.
    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError>;
}
