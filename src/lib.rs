// SPARCS DRG Aggregation Pipeline
// Copyright (c) 2025 SPARCS DRG Contributors
// Licensed under the MIT License

//! # SPARCS DRG Aggregation Pipeline
//!
//! A batch pipeline that pulls New York SPARCS inpatient discharge records
//! from the state's SODA dataset service, derives normalized analysis
//! columns, and produces per-facility DRG summary tables plus one combined
//! report.
//!
//! ## Overview
//!
//! For every configured discharge year the pipeline:
//! - enumerates facilities from a per-facility discharge-count listing
//! - fetches each facility's records with stable paged requests
//! - derives composite and numeric columns (zero-padded code labels, the
//!   capped length-of-stay number, the in-hospital mortality flag)
//! - caches the derived record table as a CSV artifact per facility/year
//! - aggregates records into a wide per-DRG summary table (discharge
//!   counts, length-of-stay statistics and percentiles, mortality rate,
//!   and category cross-tabulations)
//! - writes a run manifest and a combined report stacking every summary
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (derivation, aggregation, loading, batch)
//! - [`adapters`] - External integrations (SODA service, artifact store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sparcs_drg::adapters::soda::SodaClient;
//! use sparcs_drg::config::load_config;
//! use sparcs_drg::core::BatchOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("sparcs.toml")?;
//!
//!     let client = SodaClient::new(
//!         &config.source.base_url,
//!         config.source.page_size,
//!         &config.source.order_by,
//!     );
//!     let orchestrator =
//!         BatchOrchestrator::new(&client, &config.batch.output_dir, config.batch.refresh);
//!
//!     let outcome = orchestrator.run(&config.batch.years).await?;
//!     println!("Summarized {} facilities", outcome.manifest.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The crate uses [`domain::SparcsError`] for all errors. Facility
//! identifier coercion failures are the only recovered error during a batch
//! run; fetch, parse, and store failures abort the run.
//!
//! ## Logging
//!
//! Structured logging via the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(facility_id = 42, "Completed facility");
//! warn!(facility_id = "Albany", "Skipping facility with bad identifier");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
