//! Request-level façade over acquisition, catalog and local library.
//!
//! Every method returns a serializable response with a `success` flag and a
//! short message. No error crosses this boundary.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::acquisition::{
    AcquisitionOrchestrator, AcquisitionOutcome, DepotDownloaderTool, FetchTool,
};
use crate::catalog::{
    is_published_file_id, CatalogError, CatalogItem, SearchQuery, SteamWorkshopClient,
    WorkshopCatalog,
};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::library::{FolderOpener, LocalItem, LocalLibrary, OperationStatus, SystemOpener};
use crate::paths::{PathResolver, RegQuerySource, RegistrySource};

/// Where things live on this host.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvironmentInfo {
    pub success: bool,
    pub message: String,
    pub install_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub depot_exists: bool,
    pub accounts: usize,
}

/// A list of items.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemsResponse<T> {
    pub success: bool,
    pub message: String,
    pub items: Vec<T>,
}

/// A single remote item.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemResponse {
    pub success: bool,
    pub message: String,
    pub item: Option<CatalogItem>,
}

/// External seams of the service, swappable in tests.
pub struct ServiceParts {
    pub registry: Arc<dyn RegistrySource>,
    pub catalog: Arc<dyn WorkshopCatalog>,
    pub tool: Arc<dyn FetchTool>,
    pub opener: Arc<dyn FolderOpener>,
}

/// Entry point for every user-facing operation.
pub struct WorkshopService {
    resolver: Arc<PathResolver>,
    catalog: Arc<dyn WorkshopCatalog>,
    credentials: Arc<CredentialStore>,
    orchestrator: AcquisitionOrchestrator,
    library: LocalLibrary,
    page_size: u32,
}

impl WorkshopService {
    /// Build the service with the real registry, catalog client, fetch tool
    /// and system file browser.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let catalog = SteamWorkshopClient::new(&config.catalog, &config.product.app_id)?;
        let parts = ServiceParts {
            registry: Arc::new(RegQuerySource::new()),
            catalog: Arc::new(catalog),
            tool: Arc::new(DepotDownloaderTool::new(
                config.fetcher.resolved_tool_path(),
            )),
            opener: Arc::new(SystemOpener),
        };
        Ok(Self::with_parts(config, parts))
    }

    pub fn with_parts(config: &Config, parts: ServiceParts) -> Self {
        let resolver = Arc::new(PathResolver::new(config.product.clone(), parts.registry));
        let credentials = Arc::new(CredentialStore::from_config(&config.accounts));

        let orchestrator = AcquisitionOrchestrator::new(
            &config.product,
            &config.fetcher,
            resolver.clone(),
            credentials.clone(),
            parts.tool,
            parts.catalog.clone(),
        );
        let library = LocalLibrary::new(resolver.clone(), parts.catalog.clone(), parts.opener);

        Self {
            resolver,
            catalog: parts.catalog,
            credentials,
            orchestrator,
            library,
            page_size: config.catalog.page_size,
        }
    }

    pub async fn environment_info(&self) -> EnvironmentInfo {
        let depot_exists = self.orchestrator.tool().exists();
        let accounts = self.credentials.len();

        match self.resolver.resolve_context().await {
            Ok(context) => EnvironmentInfo {
                success: true,
                message: String::new(),
                install_dir: Some(context.install_root),
                download_dir: Some(context.content_root),
                depot_exists,
                accounts,
            },
            Err(e) => EnvironmentInfo {
                success: false,
                message: e.to_string(),
                install_dir: None,
                download_dir: None,
                depot_exists,
                accounts,
            },
        }
    }

    pub async fn list_downloads(&self) -> ItemsResponse<LocalItem> {
        let items = self.library.list().await;
        ItemsResponse {
            success: true,
            message: String::new(),
            items,
        }
    }

    /// One page of catalog results. The configured page size overrides the
    /// query's.
    pub async fn search(&self, query: SearchQuery) -> ItemsResponse<CatalogItem> {
        let query = query.with_page_size(self.page_size);
        match self.catalog.search_items(&query).await {
            Ok(items) => ItemsResponse {
                success: true,
                message: String::new(),
                items,
            },
            Err(e) => {
                warn!("Search failed: {}", e);
                ItemsResponse {
                    success: false,
                    message: e.to_string(),
                    items: Vec::new(),
                }
            }
        }
    }

    pub async fn get_item(&self, item_id: &str) -> ItemResponse {
        if !is_published_file_id(item_id) {
            return ItemResponse {
                success: false,
                message: "Invalid item id".to_string(),
                item: None,
            };
        }

        match self.catalog.fetch_item(item_id).await {
            Ok(item) => ItemResponse {
                success: true,
                message: String::new(),
                item: Some(item),
            },
            Err(e) => {
                debug!("Item {} unavailable: {}", item_id, e);
                ItemResponse {
                    success: false,
                    message: e.to_string(),
                    item: None,
                }
            }
        }
    }

    pub async fn download(&self, item_id: &str) -> AcquisitionOutcome {
        self.orchestrator.acquire(item_id).await
    }

    pub async fn delete(&self, item_id: &str) -> OperationStatus {
        if self.library.delete(item_id).await {
            OperationStatus::ok("Deleted")
        } else {
            OperationStatus::failed("Delete failed")
        }
    }

    pub async fn open_folder(&self, item_id: &str) -> OperationStatus {
        self.library.reveal(item_id).await
    }
}
