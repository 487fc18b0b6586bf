//! Local install and download API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use depot_core::{EnvironmentInfo, ItemsResponse, LocalItem, OperationStatus};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

/// Body naming an item, as `{"workshop_id": ..}` or `{"id": ..}`.
#[derive(Debug, Default, Deserialize)]
pub struct ItemIdBody {
    #[serde(default)]
    pub workshop_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl ItemIdBody {
    /// Parse a request body leniently; anything unparsable names no item.
    pub fn from_bytes(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The item id, from `workshop_id` first. Numbers are accepted too.
    pub fn item_id(&self) -> Option<String> {
        [&self.workshop_id, &self.id]
            .into_iter()
            .flatten()
            .find_map(value_to_id)
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn missing_id() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(OperationStatus::failed("Missing workshop_id")),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/info
pub async fn info(State(state): State<Arc<AppState>>) -> Json<EnvironmentInfo> {
    Json(state.service().environment_info().await)
}

/// GET /api/downloads
pub async fn list_downloads(State(state): State<Arc<AppState>>) -> Json<ItemsResponse<LocalItem>> {
    Json(state.service().list_downloads().await)
}

/// POST /api/download
///
/// Runs the whole acquisition before answering.
pub async fn start_download(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(id) = ItemIdBody::from_bytes(&body).item_id() else {
        return missing_id();
    };

    info!("Download requested for {}", id);
    Json(state.service().download(&id).await).into_response()
}

/// DELETE /api/download/{id}
pub async fn delete_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<OperationStatus> {
    Json(state.service().delete(&id).await)
}

/// POST /api/open-folder
pub async fn open_folder(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(id) = ItemIdBody::from_bytes(&body).item_id() else {
        return missing_id();
    };

    Json(state.service().open_folder(&id).await).into_response()
}
