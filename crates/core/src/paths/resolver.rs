use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::manifest::{manifest_file_name, parse_install_dir};
use super::registry::RegistrySource;
use super::{InstallationContext, PathError};
use crate::config::ProductConfig;

/// Locates the product installation and its content directory.
pub struct PathResolver {
    product: ProductConfig,
    registry: Arc<dyn RegistrySource>,
}

impl PathResolver {
    pub fn new(product: ProductConfig, registry: Arc<dyn RegistrySource>) -> Self {
        Self { product, registry }
    }

    pub fn product(&self) -> &ProductConfig {
        &self.product
    }

    /// Find the installation root. First strategy that yields an existing
    /// directory wins.
    pub async fn resolve_install_root(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = self.configured_install_dir() {
            debug!("Using configured install dir: {}", dir.display());
            return Ok(dir);
        }

        if let Some(dir) = self.install_dir_from_product_registry().await {
            info!("Found install dir via registry: {}", dir.display());
            return Ok(dir);
        }

        if let Some(root) = self.package_manager_root_from_registry().await {
            if let Some(dir) = self.install_dir_from_manifest(&root).await {
                info!("Found install dir via package manager: {}", dir.display());
                return Ok(dir);
            }
        }

        if let Some(root) = self.conventional_package_manager_root() {
            if let Some(dir) = self.install_dir_from_manifest(&root).await {
                info!("Found install dir via fallback root: {}", dir.display());
                return Ok(dir);
            }
        }

        debug!("{} installation not found", self.product.name);
        Err(PathError::NotFound {
            product: self.product.name.clone(),
        })
    }

    /// Install root joined with the content subpath, created if missing.
    pub async fn resolve_content_root(&self) -> Result<PathBuf, PathError> {
        Ok(self.resolve_context().await?.content_root)
    }

    /// Both roots at once.
    pub async fn resolve_context(&self) -> Result<InstallationContext, PathError> {
        let install_root = self.resolve_install_root().await?;
        let content_root = install_root.join(&self.product.content_subpath);

        if !content_root.is_dir() {
            tokio::fs::create_dir_all(&content_root)
                .await
                .map_err(|source| PathError::CreateFailed {
                    path: content_root.clone(),
                    source,
                })?;
            info!("Created content directory {}", content_root.display());
        }

        Ok(InstallationContext {
            install_root,
            content_root,
        })
    }

    fn configured_install_dir(&self) -> Option<PathBuf> {
        let dir = self.product.install_dir.as_ref()?;
        let dir = expand_home(dir);
        dir.is_dir().then_some(dir)
    }

    async fn install_dir_from_product_registry(&self) -> Option<PathBuf> {
        let value = self.product.registry.as_ref()?;
        let raw = self.registry.read_string(value).await?;
        let mut path = expand_home(Path::new(raw.trim()));

        // The installer may store the path of the executable itself
        let is_exe = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
        if is_exe {
            path = path.parent()?.to_path_buf();
        }

        path.is_dir().then_some(path)
    }

    async fn package_manager_root_from_registry(&self) -> Option<PathBuf> {
        for value in &self.product.package_manager.registry {
            let Some(raw) = self.registry.read_string(value).await else {
                continue;
            };
            let path = expand_home(Path::new(raw.trim()));
            if path.is_dir() {
                debug!("Found package manager root via {}: {}", value, path.display());
                return Some(path);
            }
        }
        None
    }

    fn conventional_package_manager_root(&self) -> Option<PathBuf> {
        self.product
            .package_manager
            .fallback_roots
            .iter()
            .map(|root| expand_home(root))
            .find(|root| root.is_dir())
    }

    async fn install_dir_from_manifest(&self, root: &Path) -> Option<PathBuf> {
        let package_manager = &self.product.package_manager;
        let manifest_name = manifest_file_name(&self.product.app_id);

        for library in &package_manager.library_dirs {
            let library_dir = root.join(library);
            let manifest = library_dir.join(&manifest_name);
            let Ok(bytes) = tokio::fs::read(&manifest).await else {
                continue;
            };

            let text = String::from_utf8_lossy(&bytes);
            if let Some(install_dir) = parse_install_dir(&text) {
                let candidate = library_dir
                    .join(&package_manager.install_subfolder)
                    .join(install_dir);
                if candidate.is_dir() {
                    return Some(candidate);
                }
                debug!(
                    "Manifest {} points at missing {}",
                    manifest.display(),
                    candidate.display()
                );
            }
        }
        None
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
