//! Community site catalog client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, warn};

use super::parse::{parse_item_page, parse_search_page};
use super::types::{CatalogItem, SearchQuery};
use super::{CatalogError, WorkshopCatalog};
use crate::config::CatalogConfig;

/// Scrapes workshop browse and detail pages for one app.
pub struct SteamWorkshopClient {
    client: Client,
    base_url: String,
    app_id: String,
}

impl SteamWorkshopClient {
    /// Create a new client for `app_id`.
    pub fn new(config: &CatalogConfig, app_id: &str) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| CatalogError::NotConfigured(format!("invalid accept_language: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
        })
    }

    /// Build the browse URL for a search page.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let sort = query.sort.as_str();
        let mut url = format!(
            "{}/workshop/browse/?appid={}&browsesort={}&actualsort={}&section=readytouseitems&p={}&days={}&numperpage={}\
             &created_date_range_filter_start=0&created_date_range_filter_end=0\
             &updated_date_range_filter_start=0&updated_date_range_filter_end=0",
            self.base_url,
            self.app_id,
            sort,
            sort,
            query.page.max(1),
            query.time_period_days,
            query.page_size,
        );

        let text = query.text.trim();
        if !text.is_empty() {
            url.push_str("&searchtext=");
            url.push_str(&urlencoding::encode(text));
        }

        url
    }

    async fn get_page(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Catalog returned HTTP {} for {}", status, url);
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl WorkshopCatalog for SteamWorkshopClient {
    fn detail_url(&self, id: &str) -> String {
        format!(
            "{}/sharedfiles/filedetails/?id={}",
            self.base_url,
            urlencoding::encode(id)
        )
    }

    async fn fetch_item(&self, id: &str) -> Result<CatalogItem, CatalogError> {
        let url = self.detail_url(id);
        debug!("Fetching item metadata {}", id);

        let html = self.get_page(&url).await?;
        Ok(parse_item_page(id, &url, &html))
    }

    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = self.build_search_url(query);
        debug!(
            page = query.page,
            sort = %query.sort,
            "Fetching workshop page, search='{}'",
            query.text
        );

        let html = self.get_page(&url).await?;
        let items = parse_search_page(&html);
        debug!("Workshop page {} returned {} items", query.page, items.len());
        Ok(items)
    }
}
