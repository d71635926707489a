use log::{debug, error, info, warn};
use std::path::Path;

use crate::config::Config;
use crate::core::constants::display;
use crate::validation::{BatchReport, Bucket, CheckOutcome};

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    // try_init: a second call (tests, embedding) keeps the first logger
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log the effective configuration
pub fn log_config_info(config: &Config) {
    let settings = config.run_settings();
    info!(
        "Configuration: workers={}, timeout={}s, verify_tls={}",
        settings.max_concurrency,
        settings.timeout.as_secs(),
        settings.verify_tls
    );
    info!("HTTP: user_agent={}", config.user_agent());
    if let Some(ref hosts) = config.get_only_hosts {
        if !hosts.is_empty() {
            info!("GET-only hosts: {}", hosts.join(", "));
        }
    }
}

/// Log where the URL list came from
pub fn log_input_info<P: AsRef<Path>>(url_count: usize, file: P) {
    info!("Loaded {url_count} URLs from {}", file.as_ref().display());
}

/// Log the end of a run
pub fn log_run_complete(report: &BatchReport, duration_ms: u128) {
    let issues = report.broken() + report.errors();
    if report.cancelled() {
        warn!(
            "Run cancelled: {} URLs checked, {issues} issues found ({duration_ms}ms)",
            report.total()
        );
    } else if issues == 0 {
        info!(
            "Check complete: {}/{} URLs working ({duration_ms}ms)",
            report.working(),
            report.total()
        );
    } else {
        info!(
            "Check complete: {}/{} URLs working, {issues} issues found ({duration_ms}ms)",
            report.working(),
            report.total()
        );
    }
}

/// Log one finished check at debug level
pub fn log_outcome(outcome: &CheckOutcome) {
    let mark = match outcome.bucket() {
        Bucket::Working => display::WORKING_MARK,
        Bucket::Broken => display::BROKEN_MARK,
        Bucket::Error => display::ERROR_MARK,
    };
    debug!("{mark} {outcome}");
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}
