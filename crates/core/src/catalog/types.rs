//! Types for catalog pages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An item listed in the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    /// Published file id, unique per remote item.
    pub id: String,
    pub title: String,
    pub author: String,
    /// Preview image URL.
    #[serde(rename = "img")]
    pub preview_image_url: String,
    /// Detail page URL.
    #[serde(rename = "link")]
    pub detail_url: String,
    /// Zero to five "★" characters.
    #[serde(rename = "rating")]
    pub rating_stars: String,
    /// Raw rating image URL, as found on search pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_img: Option<String>,
}

/// Published file ids are non-empty ASCII digit strings.
pub fn is_published_file_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Browse ordering supported by the catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    #[default]
    Trend,
    MostRecent,
    LastUpdated,
    TotalUniqueSubscribers,
    TextSearch,
}

impl SortMethod {
    /// Value of the `browsesort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMethod::Trend => "trend",
            SortMethod::MostRecent => "mostrecent",
            SortMethod::LastUpdated => "lastupdated",
            SortMethod::TotalUniqueSubscribers => "totaluniquesubscribers",
            SortMethod::TextSearch => "textsearch",
        }
    }

    /// Parse a query parameter value, `None` for unknown methods.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trend" => Some(SortMethod::Trend),
            "mostrecent" => Some(SortMethod::MostRecent),
            "lastupdated" => Some(SortMethod::LastUpdated),
            "totaluniquesubscribers" => Some(SortMethod::TotalUniqueSubscribers),
            "textsearch" => Some(SortMethod::TextSearch),
            _ => None,
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a browse/search page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// 1-based page number.
    pub page: u32,
    /// Free text, ignored when blank.
    pub text: String,
    pub sort: SortMethod,
    /// Trend window in days, `-1` for all time.
    pub time_period_days: i32,
    pub page_size: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            page: 1,
            text: String::new(),
            sort: SortMethod::default(),
            time_period_days: -1,
            page_size: 24,
        }
    }
}

impl SearchQuery {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_sort(mut self, sort: SortMethod) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_time_period(mut self, days: i32) -> Self {
        self.time_period_days = days;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_wire_names() {
        let item = CatalogItem {
            id: "111".to_string(),
            title: "Rain".to_string(),
            author: "someone".to_string(),
            preview_image_url: "https://img/1.jpg".to_string(),
            detail_url: "https://link/111".to_string(),
            rating_stars: "★★★".to_string(),
            rating_img: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["img"], "https://img/1.jpg");
        assert_eq!(json["link"], "https://link/111");
        assert_eq!(json["rating"], "★★★");
        assert!(json.get("rating_img").is_none());
    }

    #[test]
    fn test_is_published_file_id() {
        assert!(is_published_file_id("1234567890"));
        assert!(!is_published_file_id(""));
        assert!(!is_published_file_id("12a"));
        assert!(!is_published_file_id("../111"));
        assert!(!is_published_file_id("１２"));
    }

    #[test]
    fn test_sort_method_parse() {
        assert_eq!(SortMethod::parse("trend"), Some(SortMethod::Trend));
        assert_eq!(SortMethod::parse("MostRecent"), Some(SortMethod::MostRecent));
        assert_eq!(
            SortMethod::parse("totaluniquesubscribers"),
            Some(SortMethod::TotalUniqueSubscribers)
        );
        assert_eq!(SortMethod::parse("bogus"), None);
        assert_eq!(SortMethod::TextSearch.to_string(), "textsearch");
    }

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::default()
            .with_text("rain")
            .with_page(0)
            .with_sort(SortMethod::MostRecent)
            .with_time_period(7);

        assert_eq!(query.text, "rain");
        assert_eq!(query.page, 1);
        assert_eq!(query.sort, SortMethod::MostRecent);
        assert_eq!(query.time_period_days, 7);
        assert_eq!(query.page_size, 24);
    }
}
