//! Mock workshop catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, CatalogItem, SearchQuery, WorkshopCatalog};

/// Mock implementation of the WorkshopCatalog trait.
///
/// Items added with `add_item` are returned by `fetch_item`; unknown ids get a
/// bare record the way a detail page without markup would. Search returns the
/// configured result list. Every request is recorded.
///
/// # Example
///
/// ```rust,ignore
/// use depot_core::testing::MockCatalog;
///
/// let catalog = MockCatalog::new();
/// catalog.add_item(fixtures::catalog_item("111", "Rain")).await;
///
/// let item = catalog.fetch_item("111").await?;
/// assert_eq!(catalog.fetched_ids().await, vec!["111"]);
/// ```
#[derive(Debug, Clone)]
pub struct MockCatalog {
    items: Arc<RwLock<HashMap<String, CatalogItem>>>,
    search_results: Arc<RwLock<Vec<CatalogItem>>>,
    fail: Arc<RwLock<bool>>,
    fetched: Arc<RwLock<Vec<String>>>,
    queries: Arc<RwLock<Vec<SearchQuery>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            search_results: Arc::new(RwLock::new(Vec::new())),
            fail: Arc::new(RwLock::new(false)),
            fetched: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Make `fetch_item` return this record for its id.
    pub async fn add_item(&self, item: CatalogItem) {
        self.items.write().await.insert(item.id.clone(), item);
    }

    /// Set the results returned by every search.
    pub async fn set_search_results(&self, items: Vec<CatalogItem>) {
        *self.search_results.write().await = items;
    }

    /// Make every request fail as if the site were unreachable.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Ids passed to `fetch_item`, in call order.
    pub async fn fetched_ids(&self) -> Vec<String> {
        self.fetched.read().await.clone()
    }

    /// Queries passed to `search_items`, in call order.
    pub async fn recorded_queries(&self) -> Vec<SearchQuery> {
        self.queries.read().await.clone()
    }

    async fn check_fail(&self, url: String) -> Result<(), CatalogError> {
        if *self.fail.read().await {
            return Err(CatalogError::ApiError { status: 503, url });
        }
        Ok(())
    }
}

#[async_trait]
impl WorkshopCatalog for MockCatalog {
    fn detail_url(&self, id: &str) -> String {
        format!("https://catalog.test/item/{}", id)
    }

    async fn fetch_item(&self, id: &str) -> Result<CatalogItem, CatalogError> {
        self.fetched.write().await.push(id.to_string());
        self.check_fail(self.detail_url(id)).await?;

        if let Some(item) = self.items.read().await.get(id) {
            return Ok(item.clone());
        }

        Ok(CatalogItem {
            id: id.to_string(),
            title: id.to_string(),
            author: crate::catalog::UNKNOWN_AUTHOR.to_string(),
            preview_image_url: String::new(),
            detail_url: self.detail_url(id),
            rating_stars: String::new(),
            rating_img: None,
        })
    }

    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        self.queries.write().await.push(query.clone());
        self.check_fail("https://catalog.test/browse".to_string())
            .await?;
        Ok(self.search_results.read().await.clone())
    }
}
