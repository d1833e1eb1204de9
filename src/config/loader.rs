//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SparcsConfig;
use crate::domain::errors::SparcsError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SparcsConfig
/// 4. Applies environment variable overrides (SPARCS_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<SparcsConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SparcsError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SparcsError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SparcsConfig = toml::from_str(&contents)
        .map_err(|e| SparcsError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SparcsError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SparcsError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SparcsError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SPARCS_* prefix
///
/// Environment variables follow the pattern: SPARCS_<SECTION>_<KEY>
/// For example: SPARCS_SOURCE_BASE_URL, SPARCS_BATCH_OUTPUT_DIR
fn apply_env_overrides(config: &mut SparcsConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("SPARCS_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("SPARCS_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Ok(val) = std::env::var("SPARCS_SOURCE_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.source.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("SPARCS_SOURCE_ORDER_BY") {
        config.source.order_by = val;
    }

    // Batch overrides
    if let Ok(val) = std::env::var("SPARCS_BATCH_OUTPUT_DIR") {
        config.batch.output_dir = val;
    }
    if let Ok(val) = std::env::var("SPARCS_BATCH_YEARS") {
        let years: Vec<i32> = val
            .split(',')
            .filter_map(|y| y.trim().parse().ok())
            .collect();
        if !years.is_empty() {
            config.batch.years = years;
        }
    }
    if let Ok(val) = std::env::var("SPARCS_BATCH_REFRESH") {
        config.batch.refresh = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SPARCS_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SPARCS_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
