//! Configuration management
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! The pipeline reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `SPARCS_*` environment variable overrides
//! - Type-safe configuration structs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! base_url = "https://health.data.ny.gov/resource/"
//! page_size = 10000
//!
//! [batch]
//! output_dir = "./data"
//! years = [2009, 2010, 2011, 2012, 2013, 2014]
//! refresh = false
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{ApplicationConfig, BatchConfig, LoggingConfig, SourceConfig, SparcsConfig};
