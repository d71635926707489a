//! Configuration management
//!
//! This module handles loading configuration from TOML files, merging it
//! with CLI arguments, and producing the [`RunSettings`] handed to the
//! dispatcher.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::core::constants::{defaults, output_formats, timeouts};
use crate::core::error::{Result, UrlCheckError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout in seconds for each check
    pub timeout: Option<u64>,

    /// Maximum number of checks running at once
    pub concurrency: Option<usize>,

    /// Verify TLS certificates
    pub verify_tls: Option<bool>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// Hosts that are always checked with GET (no HEAD attempt)
    pub get_only_hosts: Option<Vec<String>>,

    /// Path of the CSV report
    pub output_path: Option<String>,

    /// Console output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Disable the progress bar
    pub no_progress: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            concurrency: Some(defaults::MAX_CONCURRENCY),
            verify_tls: Some(defaults::VERIFY_TLS),
            user_agent: None,
            get_only_hosts: None,
            output_path: Some(defaults::OUTPUT_PATH.to_string()),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            no_progress: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file. Keys missing from the file keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            UrlCheckError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let file_config: Config = toml::from_str(&content).map_err(|e| {
            UrlCheckError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::default().overlay(file_config);
        config.validate()?;
        Ok(config)
    }

    /// Load `.urlcheck.toml` from the working directory when present
    pub fn load_from_standard_location() -> Result<Self> {
        let path = Path::new(defaults::CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    fn overlay(mut self, other: Config) -> Self {
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.concurrency.is_some() {
            self.concurrency = other.concurrency;
        }
        if other.verify_tls.is_some() {
            self.verify_tls = other.verify_tls;
        }
        if other.user_agent.is_some() {
            self.user_agent = other.user_agent;
        }
        if other.get_only_hosts.is_some() {
            self.get_only_hosts = other.get_only_hosts;
        }
        if other.output_path.is_some() {
            self.output_path = other.output_path;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.no_progress.is_some() {
            self.no_progress = other.no_progress;
        }
        self
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Core options
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(concurrency) = cli_config.concurrency {
            self.concurrency = Some(concurrency);
        }

        // Network & security
        if cli_config.insecure {
            self.verify_tls = Some(false);
        } else if cli_config.verify_tls {
            self.verify_tls = Some(true);
        }
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if !cli_config.get_only_hosts.is_empty() {
            let hosts = self.get_only_hosts.get_or_insert_with(Vec::new);
            for host in &cli_config.get_only_hosts {
                if !hosts.contains(host) {
                    hosts.push(host.clone());
                }
            }
        }

        // Output & format
        if let Some(ref output_path) = cli_config.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if cli_config.no_progress {
            self.no_progress = Some(true);
        }
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Settings threaded into every check of a run
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            max_concurrency: self.concurrency.unwrap_or(defaults::MAX_CONCURRENCY),
            timeout: self.timeout_duration(),
            verify_tls: self.verify_tls.unwrap_or(defaults::VERIFY_TLS),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(defaults::USER_AGENT)
    }

    pub fn output_format(&self) -> &str {
        self.output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(UrlCheckError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(UrlCheckError::Config(format!(
                    "Timeout of {timeout} seconds is extremely large (>24 hours). Consider using a smaller value."
                )));
            }
        }

        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err(UrlCheckError::Config(
                    "Concurrency cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
            if concurrency > defaults::MAX_CONCURRENCY_LIMIT {
                return Err(UrlCheckError::Config(format!(
                    "Concurrency of {concurrency} is extremely high and may exhaust sockets. Consider using a smaller value."
                )));
            }
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(UrlCheckError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        if let Some(ref hosts) = self.get_only_hosts
            && let Some(blank) = hosts.iter().find(|host| host.trim().is_empty())
        {
            return Err(UrlCheckError::Config(format!(
                "Invalid GET-only host '{blank}'. Host names cannot be empty."
            )));
        }

        Ok(())
    }
}

/// Per-run settings passed explicitly to the dispatcher and every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Maximum number of checks in flight at once
    pub max_concurrency: usize,
    /// Bound on a single attempt, redirects included
    pub timeout: Duration,
    /// Verify TLS certificates
    pub verify_tls: bool,
}

impl RunSettings {
    pub fn new(max_concurrency: usize, timeout: Duration, verify_tls: bool) -> Self {
        Self {
            max_concurrency,
            timeout,
            verify_tls,
        }
    }

    /// Reject settings no run can start with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(UrlCheckError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(UrlCheckError::Config(format!(
                "max_concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.timeout.is_zero() {
            return Err(UrlCheckError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Config::default().run_settings()
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Core options
    pub timeout: Option<u64>,        // --timeout
    pub concurrency: Option<usize>,  // --workers

    // Network & security
    pub verify_tls: bool,            // --verify-tls
    pub insecure: bool,              // --insecure
    pub user_agent: Option<String>,  // --user-agent
    pub get_only_hosts: Vec<String>, // --get-only

    // Output & format
    pub output_path: Option<String>,   // --output
    pub output_format: Option<String>, // --format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub no_progress: bool,             // --no-progress

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
