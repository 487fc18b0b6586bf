use std::path::Path;
use std::sync::Arc;

use depot_core::{Config, SanitizedConfig, WorkshopService};

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<WorkshopService>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<WorkshopService>) -> Self {
        Self { config, service }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn service(&self) -> &WorkshopService {
        self.service.as_ref()
    }

    /// Directory of the web UI, if one is served.
    pub fn static_dir(&self) -> Option<&Path> {
        self.config.ui.static_dir.as_deref()
    }
}
