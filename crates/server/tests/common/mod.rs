//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock dependencies injected, enabling API testing without the fetch
//! tool, a real installation or network access.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use depot_core::{
    testing::{MockCatalog, MockFetchTool, MockOpener, StaticRegistry},
    Config, ServiceParts, WorkshopService,
};

/// Re-export fixtures for test convenience
pub use depot_core::testing::fixtures;

/// Test fixture with an installation in a temporary directory.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_download() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/download", json!({"workshop_id": "123"})).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure items and search results
    pub catalog: Arc<MockCatalog>,
    /// Mock fetch tool - script download attempts
    pub tool: Arc<MockFetchTool>,
    /// Mock opener - inspect revealed folders
    pub opener: Arc<MockOpener>,
    /// Installation root
    pub install_dir: PathBuf,
    /// Content root below the installation
    pub content_dir: PathBuf,
    /// Temporary directory holding the installation
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an installation and one account.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let install_dir = temp_dir.path().join("wallpaper_engine");
        std::fs::create_dir_all(&install_dir).expect("Failed to create install dir");

        let mut config = Config::default();
        config.product.registry = None;
        config.product.package_manager.registry.clear();
        config.product.package_manager.fallback_roots.clear();
        if test_config.installed {
            config.product.install_dir = Some(install_dir.clone());
        }
        config.accounts =
            fixtures::accounts_config(&fixtures::credentials(test_config.accounts));
        config.ui.static_dir = test_config.static_dir.clone();

        let content_dir = install_dir.join(&config.product.content_subpath);

        // Create mocks
        let catalog = Arc::new(MockCatalog::new());
        let tool = Arc::new(if test_config.tool_present {
            MockFetchTool::new()
        } else {
            MockFetchTool::missing()
        });
        let opener = Arc::new(MockOpener::new());

        let service = WorkshopService::with_parts(
            &config,
            ServiceParts {
                registry: Arc::new(StaticRegistry::new()),
                catalog: catalog.clone(),
                tool: tool.clone(),
                opener: opener.clone(),
            },
        );

        let state = Arc::new(depot_server::state::AppState::new(
            config,
            Arc::new(service),
        ));

        // Create router
        let router = depot_server::api::create_router(state);

        Self {
            router,
            catalog,
            tool,
            opener,
            install_dir,
            content_dir,
            temp_dir,
        }
    }

    /// Create an item directory, optionally with a metadata file.
    pub fn add_local_item(&self, id: &str, meta: Option<Value>) -> PathBuf {
        let dir = self.content_dir.join(id);
        std::fs::create_dir_all(&dir).expect("Failed to create item dir");
        if let Some(meta) = meta {
            std::fs::write(dir.join("meta.json"), meta.to_string())
                .expect("Failed to write metadata");
        }
        dir
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Point the product at the temporary installation
    pub installed: bool,
    /// Whether the fetch tool binary exists
    pub tool_present: bool,
    /// Number of configured accounts
    pub accounts: usize,
    /// Static UI directory
    pub static_dir: Option<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            installed: true,
            tool_present: true,
            accounts: 1,
            static_dir: None,
        }
    }
}

impl TestConfig {
    /// No installation can be discovered.
    pub fn not_installed() -> Self {
        Self {
            installed: false,
            ..Default::default()
        }
    }

    /// The fetch tool binary is absent.
    pub fn without_tool() -> Self {
        Self {
            tool_present: false,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
