use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{downloads, handlers, workshop};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir().map(|dir| dir.to_path_buf());

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Local install and downloads
        .route("/info", get(downloads::info))
        .route("/downloads", get(downloads::list_downloads))
        .route("/download", post(downloads::start_download))
        .route("/download/{id}", delete(downloads::delete_download))
        .route("/open-folder", post(downloads::open_folder))
        // Remote catalog
        .route("/search", get(workshop::search))
        .route("/item/{id}", get(workshop::get_item))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().nest("/api", api_routes);

    // Serve the UI with SPA fallback
    let router = match static_dir {
        Some(dir) => {
            let index_path = dir.join("index.html");
            router.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index_path)))
        }
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
