//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "sparcs.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: sparcs-drg validate-config");
                println!("  3. Run the batch: sparcs-drg run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the default configuration
    fn generate_config() -> String {
        r#"# SPARCS DRG Aggregation Pipeline Configuration

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[source]
# Resource root of the SODA service
base_url = "https://health.data.ny.gov/resource/"

# Rows per page for the paged record fetch
page_size = 10000

# Stable row key for pagination ordering
order_by = ":id"

[batch]
# Base directory for cache and summary artifacts
output_dir = "./data"

# Discharge years to process (2009-2014 supported)
years = [2009, 2010, 2011, 2012, 2013, 2014]

# Refetch facilities even when a cache artifact exists
refresh = false

[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Directory for local log files
local_path = "./logs"

# File rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
