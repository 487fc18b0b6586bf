use std::path::Component;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - App id is a non-empty numeric string
/// - Content subpath is relative and stays inside the install root
/// - Fetch and catalog timeouts are non-zero
/// - Search page size is within 1..=100
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let app_id = &config.product.app_id;
    if app_id.is_empty() || !app_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::ValidationError(format!(
            "product.app_id must be numeric, got '{}'",
            app_id
        )));
    }

    let subpath = &config.product.content_subpath;
    let escapes = subpath.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if subpath.as_os_str().is_empty() || subpath.is_absolute() || escapes {
        return Err(ConfigError::ValidationError(format!(
            "product.content_subpath must be a relative path below the install root, got '{}'",
            subpath.display()
        )));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    if !(1..=100).contains(&config.catalog.page_size) {
        return Err(ConfigError::ValidationError(format!(
            "catalog.page_size must be between 1 and 100, got {}",
            config.catalog.page_size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_non_numeric_app_id_fails() {
        let mut config = Config::default();
        config.product.app_id = "wallpaper".to_string();
        assert!(validate_config(&config).is_err());

        config.product.app_id = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_escaping_subpath_fails() {
        let mut config = Config::default();
        config.product.content_subpath = PathBuf::from("../outside");
        assert!(validate_config(&config).is_err());

        config.product.content_subpath = std::env::temp_dir();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.fetcher.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        assert!(validate_config(&config).is_err());

        config.catalog.page_size = 101;
        assert!(validate_config(&config).is_err());

        config.catalog.page_size = 100;
        assert!(validate_config(&config).is_ok());
    }
}
