// Command-line interface definitions and parsing for urlcheck

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bulk URL status checker", long_about = None)]
pub struct Cli {
    /// File containing URLs (one per line)
    pub file: Option<String>,

    // Core Options
    /// Timeout per request in seconds (default: 10)
    #[arg(
        short = 't',
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..),
        help_heading = "Core Options"
    )]
    pub timeout: Option<u64>,

    /// Maximum number of concurrent checks (default: 10)
    #[arg(
        short = 'w',
        long,
        value_name = "COUNT",
        help_heading = "Core Options"
    )]
    pub workers: Option<usize>,

    // Output & Verbosity
    /// Output CSV file (default: url_check_results.csv)
    #[arg(short = 'o', long, value_name = "FILE", help_heading = "Output & Verbosity")]
    pub output: Option<String>,

    /// Console output format
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Only print the final summary
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Disable progress bars
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Network & Security
    /// Verify TLS certificates (the default)
    #[arg(long, conflicts_with = "insecure", help_heading = "Network & Security")]
    pub verify_tls: bool,

    /// Skip TLS certificate verification
    #[arg(long, help_heading = "Network & Security")]
    pub insecure: bool,

    /// Custom User-Agent header
    #[arg(long, value_name = "AGENT", help_heading = "Network & Security")]
    pub user_agent: Option<String>,

    /// Host to check with GET only, skipping HEAD (repeatable)
    #[arg(long = "get-only", value_name = "HOST", help_heading = "Network & Security")]
    pub get_only: Vec<String>,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, conflicts_with = "config", help_heading = "Configuration")]
    pub no_config: bool,
}

/// Convert parsed CLI arguments into a CliConfig
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        timeout: cli.timeout,
        concurrency: cli.workers,
        verify_tls: cli.verify_tls,
        insecure: cli.insecure,
        user_agent: cli.user_agent.clone(),
        get_only_hosts: cli
            .get_only
            .iter()
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .collect(),
        output_path: cli.output.clone(),
        output_format: cli.format.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_progress: cli.no_progress,
        config_file: cli.config.clone(),
        no_config: cli.no_config,
    }
}
