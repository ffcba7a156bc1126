//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// The upgrade catalog: ordered item-type and stage enumerations plus the
/// listed (advertised) success rate per stage.
///
/// These are data, not business logic. The defaults mirror the reference
/// dataset but any table of the same shape is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeCatalog {
    /// Ordered item-type labels
    #[serde(default = "default_item_types")]
    pub item_types: Vec<String>,

    /// Ordered stage-transition labels; the index is the semantic key
    #[serde(default = "default_stage_labels")]
    pub stage_labels: Vec<String>,

    /// Listed success rate per stage index, in [0, 1]
    #[serde(default = "default_reference_rates")]
    pub reference_rates: Vec<f64>,
}

fn default_item_types() -> Vec<String> {
    ["weapon", "armor", "accessory"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_stage_labels() -> Vec<String> {
    ["0 → 1", "1 → 2", "2 → 3", "3 → 4", "4 → 5", "5 → 6"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_reference_rates() -> Vec<f64> {
    vec![0.9, 0.85, 0.8, 0.5, 0.4, 0.1]
}

impl Default for UpgradeCatalog {
    fn default() -> Self {
        Self {
            item_types: default_item_types(),
            stage_labels: default_stage_labels(),
            reference_rates: default_reference_rates(),
        }
    }
}

impl UpgradeCatalog {
    /// Number of upgrade stages.
    pub fn stage_count(&self) -> usize {
        self.stage_labels.len()
    }

    /// Listed success rate for a stage.
    ///
    /// Panics on an out-of-range index: stage indices only ever come from
    /// iterating the catalog itself, so this is a programming error.
    pub fn reference_rate(&self, stage_idx: usize) -> f64 {
        self.reference_rates[stage_idx]
    }

    /// Validate the catalog shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_types.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one item type is required".to_string(),
            ));
        }

        if self.stage_labels.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one upgrade stage is required".to_string(),
            ));
        }

        if self.reference_rates.len() != self.stage_labels.len() {
            return Err(ConfigError::ValidationError(format!(
                "Expected {} reference rates, got {}",
                self.stage_labels.len(),
                self.reference_rates.len()
            )));
        }

        if let Some(rate) = self
            .reference_rates
            .iter()
            .find(|r| !(0.0..=1.0).contains(*r))
        {
            return Err(ConfigError::ValidationError(format!(
                "Reference rate {} is outside [0, 1]",
                rate
            )));
        }

        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub catalog: UpgradeCatalog,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            catalog: UpgradeCatalog::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.catalog.item_types.len(), 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_default_catalog() {
        let catalog = UpgradeCatalog::default();

        assert_eq!(catalog.item_types[0], "weapon");
        assert_eq!(catalog.stage_count(), 6);
        assert_eq!(catalog.stage_labels[0], "0 → 1");
        assert_eq!(catalog.reference_rates.len(), 6);
    }

    #[test]
    fn test_reference_rate_lookup() {
        let catalog = UpgradeCatalog::default();

        assert_eq!(catalog.reference_rate(0), 0.9);
        assert_eq!(catalog.reference_rate(3), 0.5);
        assert_eq!(catalog.reference_rate(5), 0.1);
    }

    #[test]
    #[should_panic]
    fn test_reference_rate_out_of_range_panics() {
        let catalog = UpgradeCatalog::default();
        catalog.reference_rate(6);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_catalog_validation_rate_count_mismatch() {
        let mut catalog = UpgradeCatalog::default();
        catalog.reference_rates.pop();

        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_validation_rate_out_of_bounds() {
        let mut catalog = UpgradeCatalog::default();
        catalog.reference_rates[0] = 1.5;

        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_catalog_validation_empty_items() {
        let mut catalog = UpgradeCatalog::default();
        catalog.item_types.clear();

        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.catalog.item_types, parsed.catalog.item_types);
    }
}
