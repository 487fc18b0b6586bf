use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub product: ProductConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    5005
}

/// Static UI configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UiConfig {
    /// Directory with the front-end files, served for every non-API path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

/// Registry hive holding a value.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum RegistryHive {
    #[serde(rename = "HKLM")]
    LocalMachine,
    #[serde(rename = "HKCU")]
    CurrentUser,
}

impl RegistryHive {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryHive::LocalMachine => "HKLM",
            RegistryHive::CurrentUser => "HKCU",
        }
    }
}

/// A single named value under a registry key.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct RegistryValue {
    pub hive: RegistryHive,
    pub key: String,
    pub value: String,
}

impl RegistryValue {
    pub fn new(hive: RegistryHive, key: &str, value: &str) -> Self {
        Self {
            hive,
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}:{}", self.hive.as_str(), self.key, self.value)
    }
}

/// The product whose content directory is managed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductConfig {
    /// Platform application id (Wallpaper Engine is 431960).
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// Human readable product name used in messages.
    #[serde(default = "default_product_name")]
    pub name: String,
    /// Content directory relative to the installation root.
    #[serde(default = "default_content_subpath")]
    pub content_subpath: PathBuf,
    /// Explicit installation root, tried before any discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    /// Registry value written by the product's own installer.
    #[serde(
        default = "default_product_registry",
        skip_serializing_if = "Option::is_none"
    )]
    pub registry: Option<RegistryValue>,
    #[serde(default)]
    pub package_manager: PackageManagerConfig,
}

fn default_app_id() -> String {
    "431960".to_string()
}

fn default_product_name() -> String {
    "Wallpaper Engine".to_string()
}

fn default_content_subpath() -> PathBuf {
    PathBuf::from("projects").join("myprojects")
}

fn default_product_registry() -> Option<RegistryValue> {
    Some(RegistryValue::new(
        RegistryHive::CurrentUser,
        r"Software\WallpaperEngine",
        "installPath",
    ))
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            name: default_product_name(),
            content_subpath: default_content_subpath(),
            install_dir: None,
            registry: default_product_registry(),
            package_manager: PackageManagerConfig::default(),
        }
    }
}

/// Package manager (Steam) discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageManagerConfig {
    /// Registry values holding the package manager root, highest priority first.
    #[serde(default = "default_package_manager_registry")]
    pub registry: Vec<RegistryValue>,
    /// Conventional package manager roots, checked in order.
    #[serde(default = "default_fallback_roots")]
    pub fallback_roots: Vec<PathBuf>,
    /// Library folder names under the root holding app manifests.
    #[serde(default = "default_library_dirs")]
    pub library_dirs: Vec<String>,
    /// Folder under the library holding installed apps.
    #[serde(default = "default_install_subfolder")]
    pub install_subfolder: String,
}

fn default_package_manager_registry() -> Vec<RegistryValue> {
    vec![
        RegistryValue::new(
            RegistryHive::LocalMachine,
            r"SOFTWARE\WOW6432Node\Valve\Steam",
            "InstallPath",
        ),
        RegistryValue::new(
            RegistryHive::LocalMachine,
            r"SOFTWARE\Valve\Steam",
            "InstallPath",
        ),
        RegistryValue::new(RegistryHive::CurrentUser, r"SOFTWARE\Valve\Steam", "SteamPath"),
    ]
}

fn default_fallback_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files (x86)\Steam"),
        PathBuf::from(r"C:\Program Files\Steam"),
        PathBuf::from("~/Steam"),
    ]
}

fn default_library_dirs() -> Vec<String> {
    vec!["steamapps".to_string(), "SteamApps".to_string()]
}

fn default_install_subfolder() -> String {
    "common".to_string()
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            registry: default_package_manager_registry(),
            fallback_roots: default_fallback_roots(),
            library_dirs: default_library_dirs(),
            install_subfolder: default_install_subfolder(),
        }
    }
}

/// External fetch tool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    /// Path to the fetch tool. Relative paths are resolved against the
    /// directory of the running executable.
    #[serde(default = "default_tool_path")]
    pub tool_path: PathBuf,
    /// Timeout for a single attempt in seconds (default: 300)
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Pass the verify-all flag to the tool.
    #[serde(default = "default_true")]
    pub verify_all: bool,
}

fn default_tool_path() -> PathBuf {
    PathBuf::from("DepotDownloaderMod").join("DepotDownloaderMod.exe")
}

fn default_fetch_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            tool_path: default_tool_path(),
            timeout_secs: default_fetch_timeout(),
            verify_all: true,
        }
    }
}

impl FetcherConfig {
    /// Absolute location of the tool binary.
    pub fn resolved_tool_path(&self) -> PathBuf {
        if self.tool_path.is_absolute() {
            return self.tool_path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .map(|dir| dir.join(&self.tool_path))
            .unwrap_or_else(|| self.tool_path.clone())
    }
}

/// Remote catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Community site base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
    /// Items per search page (default: 24)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "https://steamcommunity.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_catalog_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    24
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_catalog_timeout(),
            page_size: default_page_size(),
        }
    }
}

/// Fetch tool accounts, tried in order.
#[derive(Clone, Deserialize, Serialize)]
pub struct AccountsConfig {
    /// Repeating XOR key used to obfuscate the stored passwords.
    #[serde(default = "default_secret_key")]
    pub key: String,
    #[serde(default)]
    pub entries: Vec<AccountEntry>,
}

fn default_secret_key() -> String {
    "wallpaper-engine-secret".to_string()
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            key: default_secret_key(),
            entries: Vec::new(),
        }
    }
}

impl fmt::Debug for AccountsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountsConfig")
            .field("key", &"<redacted>")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// A stored account; `password` is base64 of the XOR-obfuscated secret.
#[derive(Clone, Deserialize, Serialize)]
pub struct AccountEntry {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountEntry")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub product: ProductConfig,
    pub fetcher: FetcherConfig,
    pub catalog: CatalogConfig,
    pub accounts: SanitizedAccountsConfig,
}

/// Only reports how many accounts are configured.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAccountsConfig {
    pub configured: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            ui: config.ui.clone(),
            product: config.product.clone(),
            fetcher: config.fetcher.clone(),
            catalog: config.catalog.clone(),
            accounts: SanitizedAccountsConfig {
                configured: config.accounts.entries.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5005);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.product.app_id, "431960");
        assert_eq!(config.product.name, "Wallpaper Engine");
        assert_eq!(
            config.product.content_subpath,
            PathBuf::from("projects").join("myprojects")
        );
        assert_eq!(config.fetcher.timeout_secs, 300);
        assert!(config.fetcher.verify_all);
        assert_eq!(config.accounts.key, "wallpaper-engine-secret");
        assert!(config.accounts.entries.is_empty());
    }

    #[test]
    fn test_default_registry_priority() {
        let config = ProductConfig::default();
        let registry = &config.package_manager.registry;
        assert_eq!(registry.len(), 3);
        // Machine-wide keys come before the per-user key
        assert_eq!(registry[0].hive, RegistryHive::LocalMachine);
        assert_eq!(registry[1].hive, RegistryHive::LocalMachine);
        assert_eq!(registry[2].hive, RegistryHive::CurrentUser);
        assert_eq!(registry[2].value, "SteamPath");
    }

    #[test]
    fn test_deserialize_registry_value() {
        let toml = r#"
[product]
app_id = "123"

[product.registry]
hive = "HKLM"
key = 'Software\Example'
value = "Path"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let registry = config.product.registry.unwrap();
        assert_eq!(registry.hive, RegistryHive::LocalMachine);
        assert_eq!(registry.to_string(), r"HKLM\Software\Example:Path");
    }

    #[test]
    fn test_deserialize_accounts() {
        let toml = r#"
[accounts]
key = "k"

[[accounts.entries]]
username = "first"
password = "AAAA"

[[accounts.entries]]
username = "second"
password = "BBBB"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.accounts.key, "k");
        assert_eq!(config.accounts.entries.len(), 2);
        assert_eq!(config.accounts.entries[1].username, "second");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let entry = AccountEntry {
            username: "user".to_string(),
            password: "c2VjcmV0".to_string(),
        };
        let debug = format!("{:?}", entry);
        assert!(debug.contains("user"));
        assert!(!debug.contains("c2VjcmV0"));
    }

    #[test]
    fn test_sanitized_config_hides_accounts() {
        let mut config = Config::default();
        config.accounts.entries.push(AccountEntry {
            username: "user".to_string(),
            password: "c2VjcmV0".to_string(),
        });

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.accounts.configured, 1);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("c2VjcmV0"));
        assert!(!json.contains("wallpaper-engine-secret"));
    }

    #[test]
    fn test_resolved_tool_path_keeps_absolute() {
        let absolute = std::env::temp_dir().join("tool.exe");
        let config = FetcherConfig {
            tool_path: absolute.clone(),
            ..Default::default()
        };
        assert_eq!(config.resolved_tool_path(), absolute);
    }

    #[test]
    fn test_resolved_tool_path_relative_to_executable() {
        let config = FetcherConfig::default();
        let resolved = config.resolved_tool_path();
        assert!(resolved.ends_with(default_tool_path()));
    }
}
