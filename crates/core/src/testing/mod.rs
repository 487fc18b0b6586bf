//! Testing utilities and mock implementations.
//!
//! Mocks for every external seam (registry, remote catalog, fetch tool, file
//! browser), so acquisition and library flows can be exercised against a
//! temporary directory without network access or the real tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use depot_core::testing::{MockCatalog, MockFetchTool, ScriptedRun};
//!
//! let tool = MockFetchTool::new();
//! tool.push(ScriptedRun::exit(1, "", "Login failure")).await;
//!
//! let catalog = MockCatalog::new();
//! catalog.set_fail(true).await;
//! ```

mod mock_catalog;
mod mock_fetch_tool;
mod mock_opener;
mod mock_registry;

pub use mock_catalog::MockCatalog;
pub use mock_fetch_tool::{MockFetchTool, ScriptedRun};
pub use mock_opener::MockOpener;
pub use mock_registry::StaticRegistry;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogItem;
    use crate::config::{AccountEntry, AccountsConfig};
    use crate::credentials::{encode_secret, Credential};

    /// `count` credentials named `user1`, `user2`, ...
    pub fn credentials(count: usize) -> Vec<Credential> {
        (1..=count)
            .map(|i| Credential::new(format!("user{}", i), format!("secret{}", i)))
            .collect()
    }

    /// Accounts configuration holding `credentials`, obfuscated with the
    /// default key.
    pub fn accounts_config(credentials: &[Credential]) -> AccountsConfig {
        let mut config = AccountsConfig::default();
        config.entries = credentials
            .iter()
            .map(|c| AccountEntry {
                username: c.username().to_string(),
                password: encode_secret(c.secret(), config.key.as_bytes()),
            })
            .collect();
        config
    }

    /// A complete catalog record.
    pub fn catalog_item(id: &str, title: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: title.to_string(),
            author: "painter".to_string(),
            preview_image_url: format!("https://images.test/{}.jpg", id),
            detail_url: format!("https://catalog.test/item/{}", id),
            rating_stars: "★★★★".to_string(),
            rating_img: None,
        }
    }
}
