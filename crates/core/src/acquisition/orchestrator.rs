use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::tool::FetchTool;
use super::types::{AcquisitionOutcome, FetchInvocation};
use super::{AcquisitionError, FetchError, EXHAUSTED_MESSAGE, TIMEOUT_MESSAGE};
use crate::catalog::{is_published_file_id, WorkshopCatalog};
use crate::config::{FetcherConfig, ProductConfig};
use crate::credentials::CredentialStore;
use crate::library::{write_metadata, ItemMetadata};
use crate::paths::{PathError, PathResolver};

/// Drives the fetch tool across the stored credentials.
///
/// Attempts run strictly one after another. Two concurrent calls for the same
/// id write into the same directory; callers serialize if that matters.
pub struct AcquisitionOrchestrator {
    app_id: String,
    product_name: String,
    attempt_timeout: Duration,
    verify_all: bool,
    resolver: Arc<PathResolver>,
    credentials: Arc<CredentialStore>,
    tool: Arc<dyn FetchTool>,
    catalog: Arc<dyn WorkshopCatalog>,
}

impl AcquisitionOrchestrator {
    pub fn new(
        product: &ProductConfig,
        fetcher: &FetcherConfig,
        resolver: Arc<PathResolver>,
        credentials: Arc<CredentialStore>,
        tool: Arc<dyn FetchTool>,
        catalog: Arc<dyn WorkshopCatalog>,
    ) -> Self {
        Self {
            app_id: product.app_id.clone(),
            product_name: product.name.clone(),
            attempt_timeout: Duration::from_secs(fetcher.timeout_secs),
            verify_all: fetcher.verify_all,
            resolver,
            credentials,
            tool,
            catalog,
        }
    }

    pub fn tool(&self) -> &dyn FetchTool {
        self.tool.as_ref()
    }

    /// Acquire `item_id` into `<content root>/<item_id>`.
    pub async fn acquire(&self, item_id: &str) -> AcquisitionOutcome {
        match self.try_acquire(item_id).await {
            Ok(path) => AcquisitionOutcome::completed(path),
            Err(e) => {
                warn!("Acquisition of {:?} failed: {}", item_id, e);
                AcquisitionOutcome::failed(e.to_string())
            }
        }
    }

    async fn try_acquire(&self, item_id: &str) -> Result<PathBuf, AcquisitionError> {
        if !is_published_file_id(item_id) {
            return Err(AcquisitionError::InvalidItemId);
        }

        if !self.tool.exists() {
            return Err(AcquisitionError::ToolMissing {
                tool: self.tool.name(),
            });
        }

        let content_root = self
            .resolver
            .resolve_content_root()
            .await
            .map_err(|e| match e {
                PathError::NotFound { .. } => AcquisitionError::TargetNotFound {
                    product: self.product_name.clone(),
                },
                PathError::CreateFailed { path, source } => {
                    AcquisitionError::TargetDir { path, source }
                }
            })?;

        let credentials = self.credentials.decode_all();
        if credentials.is_empty() {
            return Err(AcquisitionError::NoAccounts);
        }

        let target = content_root.join(item_id);
        tokio::fs::create_dir_all(&target)
            .await
            .map_err(|source| AcquisitionError::TargetDir {
                path: target.clone(),
                source,
            })?;

        let mut last_error: Option<String> = None;

        for (index, credential) in credentials.iter().enumerate() {
            info!(
                item_id,
                attempt = index + 1,
                of = credentials.len(),
                username = credential.username(),
                "Starting download"
            );

            let invocation = FetchInvocation {
                app_id: self.app_id.clone(),
                item_id: item_id.to_string(),
                credential: credential.clone(),
                verify_all: self.verify_all,
                target_dir: target.clone(),
            };

            match self.tool.run(&invocation, self.attempt_timeout).await {
                Ok(output) => {
                    if !output.stdout.trim().is_empty() {
                        debug!(item_id, "tool stdout: {}", output.stdout.trim());
                    }
                    if !output.stderr.trim().is_empty() {
                        warn!(item_id, "tool stderr: {}", output.stderr.trim());
                    }

                    if output.success() {
                        info!(item_id, "Download complete: {}", target.display());
                        self.persist_metadata(item_id, &target).await;
                        return Ok(target);
                    }

                    let message = output.failure_message();
                    warn!(
                        item_id,
                        username = credential.username(),
                        exit_code = ?output.exit_code,
                        "Attempt failed: {}",
                        message
                    );
                    last_error = Some(message);
                }
                Err(FetchError::Timeout { timeout_secs }) => {
                    warn!(
                        item_id,
                        username = credential.username(),
                        "Attempt timed out after {}s",
                        timeout_secs
                    );
                    last_error = Some(TIMEOUT_MESSAGE.to_string());
                }
                Err(FetchError::ToolNotFound { .. }) => {
                    return Err(AcquisitionError::ToolMissing {
                        tool: self.tool.name(),
                    });
                }
                Err(FetchError::Io(e)) => {
                    warn!(item_id, "Failed to launch fetch tool: {}", e);
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(AcquisitionError::CredentialsExhausted {
            last_error: last_error.unwrap_or_else(|| EXHAUSTED_MESSAGE.to_string()),
        })
    }

    /// Fetch and store metadata for a finished item. Failures only log.
    async fn persist_metadata(&self, item_id: &str, target: &Path) {
        let item = match self.catalog.fetch_item(item_id).await {
            Ok(item) => item,
            Err(e) => {
                debug!("No metadata for {}: {}", item_id, e);
                return;
            }
        };

        if let Err(e) = write_metadata(target, &ItemMetadata::from(item)).await {
            warn!("Failed to write metadata for {}: {}", item_id, e);
        }
    }
}
