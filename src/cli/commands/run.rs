//! Run command implementation
//!
//! This module implements the `run` command, which drives the full batch:
//! facility enumeration, cached record loading, per-facility summaries, the
//! run manifest, and the combined report.

use crate::adapters::soda::SodaClient;
use crate::config::load_config;
use crate::core::BatchOrchestrator;
use clap::Args;
use std::time::Instant;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override discharge years to process (comma-separated)
    #[arg(long)]
    pub years: Option<String>,

    /// Override the output directory for artifacts
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Refetch facilities even when a cache artifact exists
    #[arg(long)]
    pub refresh: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting batch run");

        let mut config = load_config(config_path)?;

        // Apply CLI overrides
        if let Some(years) = &self.years {
            let parsed: Vec<i32> = years
                .split(',')
                .map(|y| y.trim().parse())
                .collect::<Result<_, _>>()
                .map_err(|e| anyhow::anyhow!("Invalid --years value '{years}': {e}"))?;
            tracing::info!(years = ?parsed, "Overriding years from CLI");
            config.batch.years = parsed;
        }

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.batch.output_dir = output_dir.clone();
        }

        if self.refresh {
            tracing::info!("Enabling cache refresh from CLI");
            config.batch.refresh = true;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;

        let client = SodaClient::new(
            &config.source.base_url,
            config.source.page_size,
            &config.source.order_by,
        );
        let orchestrator =
            BatchOrchestrator::new(&client, &config.batch.output_dir, config.batch.refresh);

        println!("🏥 SPARCS DRG aggregation");
        println!("   Years: {:?}", config.batch.years);
        println!("   Output: {}", config.batch.output_dir);
        println!();

        let started = Instant::now();
        match orchestrator.run(&config.batch.years).await {
            Ok(outcome) => {
                println!("✅ Batch complete in {:.1?}", started.elapsed());
                println!("   Facilities summarized: {}", outcome.manifest.len());
                println!("   Facilities skipped: {}", outcome.skipped.len());
                println!("   Combined report rows: {}", outcome.combined.row_count());
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Batch run failed");
                eprintln!("❌ Batch run failed: {e}");
                Ok(1)
            }
        }
    }
}
