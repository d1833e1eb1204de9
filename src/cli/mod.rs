//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the pipeline using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// SPARCS DRG aggregation pipeline
#[derive(Parser, Debug)]
#[command(name = "sparcs-drg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sparcs.toml", env = "SPARCS_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SPARCS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the batch: fetch, derive, summarize, and combine
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["sparcs-drg", "run"]);
        assert_eq!(cli.config, "sparcs.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["sparcs-drg", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["sparcs-drg", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_run_overrides() {
        let cli = Cli::parse_from([
            "sparcs-drg",
            "run",
            "--years",
            "2013,2014",
            "--output-dir",
            "./out",
            "--refresh",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.years, Some("2013,2014".to_string()));
                assert_eq!(args.output_dir, Some("./out".to_string()));
                assert!(args.refresh);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["sparcs-drg", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["sparcs-drg", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
