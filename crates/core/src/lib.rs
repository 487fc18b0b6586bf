pub mod acquisition;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod library;
pub mod paths;
pub mod service;
pub mod testing;

pub use acquisition::{
    AcquisitionError, AcquisitionOrchestrator, AcquisitionOutcome, DepotDownloaderTool,
    FetchError, FetchInvocation, FetchOutput, FetchTool,
};
pub use catalog::{CatalogError, CatalogItem, SearchQuery, SortMethod, SteamWorkshopClient, WorkshopCatalog};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use credentials::{Credential, CredentialStore};
pub use library::{FolderOpener, ItemMetadata, LibraryError, LocalItem, LocalLibrary, OperationStatus};
pub use paths::{InstallationContext, PathError, PathResolver, RegistrySource};
pub use service::{EnvironmentInfo, ItemResponse, ItemsResponse, ServiceParts, WorkshopService};
