//! Remote catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use depot_core::{CatalogItem, ItemResponse, ItemsResponse, SearchQuery, SortMethod};
use serde::Deserialize;

use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

/// Query string of a browse request. Every field is optional and malformed
/// values fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub searchtext: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub sortmethod: Option<String>,
    #[serde(default)]
    pub timeperiod: Option<String>,
}

impl SearchParams {
    pub fn to_query(&self) -> SearchQuery {
        let mut query = SearchQuery::default();

        if let Some(text) = &self.searchtext {
            query = query.with_text(text.trim());
        }
        if let Some(page) = self.page.as_deref().and_then(|p| p.trim().parse::<u32>().ok()) {
            query = query.with_page(page);
        }
        if let Some(sort) = self.sortmethod.as_deref().and_then(SortMethod::parse) {
            query = query.with_sort(sort);
        }
        if let Some(days) = self
            .timeperiod
            .as_deref()
            .and_then(|d| d.trim().parse::<i32>().ok())
        {
            query = query.with_time_period(days);
        }

        query
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<ItemsResponse<CatalogItem>> {
    Json(state.service().search(params.to_query()).await)
}

/// GET /api/item/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ItemResponse> {
    Json(state.service().get_item(&id).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_defaults() {
        let query = SearchParams::default().to_query();
        assert_eq!(query, SearchQuery::default());
    }

    #[test]
    fn test_search_params_parsing() {
        let params = SearchParams {
            searchtext: Some(" city ".to_string()),
            page: Some("3".to_string()),
            sortmethod: Some("mostrecent".to_string()),
            timeperiod: Some("7".to_string()),
        };
        let query = params.to_query();
        assert_eq!(query.text, "city");
        assert_eq!(query.page, 3);
        assert_eq!(query.sort, SortMethod::MostRecent);
        assert_eq!(query.time_period_days, 7);
    }

    #[test]
    fn test_search_params_malformed_values() {
        let params = SearchParams {
            searchtext: None,
            page: Some("abc".to_string()),
            sortmethod: Some("sideways".to_string()),
            timeperiod: Some("".to_string()),
        };
        assert_eq!(params.to_query(), SearchQuery::default());
    }
}
