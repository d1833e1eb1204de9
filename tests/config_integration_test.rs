//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use sparcs_drg::config::load_config;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("SPARCS_APPLICATION_LOG_LEVEL");
    std::env::remove_var("SPARCS_SOURCE_BASE_URL");
    std::env::remove_var("SPARCS_SOURCE_PAGE_SIZE");
    std::env::remove_var("SPARCS_BATCH_OUTPUT_DIR");
    std::env::remove_var("SPARCS_BATCH_REFRESH");
    std::env::remove_var("TEST_SPARCS_OUTPUT");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[source]
base_url = "https://health.data.ny.gov/resource/"
page_size = 5000
order_by = ":id"

[batch]
output_dir = "./artifacts"
years = [2012, 2013, 2014]
refresh = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.source.page_size, 5000);
    assert_eq!(config.batch.output_dir, "./artifacts");
    assert_eq!(config.batch.years, vec![2012, 2013, 2014]);
    assert!(config.batch.refresh);
}

#[test]
fn test_minimal_config_falls_back_to_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[application]\nlog_level = \"info\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.source.base_url, "https://health.data.ny.gov/resource/");
    assert_eq!(config.source.page_size, 10_000);
    assert_eq!(config.source.order_by, ":id");
    assert_eq!(config.batch.output_dir, "./data");
    assert_eq!(config.batch.years, vec![2009, 2010, 2011, 2012, 2013, 2014]);
    assert!(!config.batch.refresh);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[source]\npage_size = 100\n");

    std::env::set_var("SPARCS_SOURCE_PAGE_SIZE", "250");
    std::env::set_var("SPARCS_BATCH_OUTPUT_DIR", "/tmp/sparcs-out");
    std::env::set_var("SPARCS_BATCH_REFRESH", "true");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.source.page_size, 250);
    assert_eq!(config.batch.output_dir, "/tmp/sparcs-out");
    assert!(config.batch.refresh);

    cleanup_env_vars();
}

#[test]
fn test_env_var_substitution_in_values() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_SPARCS_OUTPUT", "/tmp/from-env");
    let file = write_config("[batch]\noutput_dir = \"${TEST_SPARCS_OUTPUT}\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.batch.output_dir, "/tmp/from-env");

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[source]\npage_size = 0\n");
    assert!(load_config(file.path()).is_err());

    let file = write_config("[batch]\nyears = [2020]\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_missing_config_file_rejected() {
    let result = load_config("/nonexistent/sparcs.toml");
    assert!(result.is_err());
}
