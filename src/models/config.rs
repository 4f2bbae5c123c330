//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::types::{DEFAULT_PAGE_SIZE, PageSize};

fn default_debounce_ms() -> u64 {
    500
}

fn default_per_page() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 20]
}

fn validate_default_in_options(config: &GridConfig) -> Result<(), ValidationError> {
    if config.page_size_options.is_empty()
        || config.page_size_options.contains(&config.default_per_page)
    {
        Ok(())
    } else {
        Err(ValidationError::new("default_per_page_not_in_options")
            .with_message("default_per_page must be one of page_size_options".into()))
    }
}

/// Tuning shared by every grid controller.
#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_default_in_options"))]
pub struct GridConfig {
    /// Quiet period before a filter or search edit navigates.
    #[serde(default = "default_debounce_ms")]
    #[validate(range(min = 1, max = 10000))]
    pub debounce_ms: u64,
    /// Rows per page when the URL has no `perPage`.
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1))]
    pub default_per_page: usize,
    /// Page sizes a user may pick; empty allows any positive size.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_per_page: default_per_page(),
            page_size_options: default_page_size_options(),
        }
    }
}

impl GridConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn default_page_size(&self) -> PageSize {
        PageSize::new(self.default_per_page).unwrap_or_default()
    }

    pub fn allows_page_size(&self, page_size: PageSize) -> bool {
        self.page_size_options.is_empty() || self.page_size_options.contains(&page_size.get())
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Basic configuration of the reference backend.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// JSON file holding the product catalog served by the API.
    pub catalog_path: String,
    /// Permissions granted to API callers.
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub grid: GridConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_grid_conventions() {
        let config = GridConfig::default();

        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.default_page_size().get(), 20);
        assert!(config.allows_page_size(PageSize::new(5).unwrap()));
        assert!(!config.allows_page_size(PageSize::new(50).unwrap()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_option_list_allows_any_size() {
        let config = GridConfig {
            page_size_options: Vec::new(),
            ..GridConfig::default()
        };

        assert!(config.allows_page_size(PageSize::new(37).unwrap()));
    }

    #[test]
    fn zero_debounce_fails_validation() {
        let config = GridConfig {
            debounce_ms: 0,
            ..GridConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn default_page_size_must_be_an_option() {
        let config = GridConfig {
            page_size_options: vec![5, 10],
            ..GridConfig::default()
        };

        assert!(config.validate().is_err());

        let config = GridConfig {
            default_per_page: 10,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_config_rejects_grid_default_outside_options() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"address": "127.0.0.1", "port": 8080, "catalog_path": "catalog.json",
                "grid": {"default_per_page": 25}}"#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn server_config_fills_grid_defaults() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"address": "127.0.0.1", "port": 8080, "catalog_path": "catalog.json"}"#,
        )
        .unwrap();

        assert_eq!(config.grid.debounce_ms, 500);
        assert!(config.permissions.is_empty());
    }
}
