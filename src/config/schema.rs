//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML
//! file (`sparcs.toml` by default).

use serde::{Deserialize, Serialize};

use crate::adapters::soda::{dataset_tag_for_year, DEFAULT_ORDER_BY, DEFAULT_PAGE_SIZE};

/// Main pipeline configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparcsConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote dataset service settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Batch run settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SparcsConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.batch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Default for SparcsConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            source: SourceConfig::default(),
            batch: BatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Remote dataset service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Resource root of the SODA service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Rows per page for the paged record fetch
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Stable row key the paged fetch orders by
    #[serde(default = "default_order_by")]
    pub order_by: String,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("source.page_size must be at least 1".to_string());
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid source.base_url '{}': {}", self.base_url, e))?;
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            order_by: default_order_by(),
        }
    }
}

/// Batch run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Base directory for cache and summary artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Discharge years to process
    #[serde(default = "default_years")]
    pub years: Vec<i32>,

    /// Refetch facilities even when a cache artifact exists
    #[serde(default)]
    pub refresh: bool,
}

impl BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.years.is_empty() {
            return Err("batch.years must not be empty".to_string());
        }
        for year in &self.years {
            if dataset_tag_for_year(*year).is_none() {
                return Err(format!(
                    "No dataset tag known for year {year} (supported: 2009-2014)"
                ));
            }
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            years: default_years(),
            refresh: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rotating files in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// File rotation: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://health.data.ny.gov/resource/".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_order_by() -> String {
    DEFAULT_ORDER_BY.to_string()
}

fn default_output_dir() -> String {
    "./data".to_string()
}

fn default_years() -> Vec<i32> {
    (2009..=2014).collect()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
