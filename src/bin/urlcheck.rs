use clap::Parser;
use tokio_util::sync::CancellationToken;
use urlcheck::config::{CliConfig, Config};
use urlcheck::core::constants::{defaults, exit_codes, output_formats};
use urlcheck::input::load_urls_from_file;
use urlcheck::reporting::{self, logging};
use urlcheck::ui::output;
use urlcheck::ui::{Cli, ProgressReporter, cli_to_config};
use urlcheck::validation::{BatchReport, Checker, Dispatcher, ProgressSink};
use urlcheck::UrlTarget;

use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run_urlcheck_logic(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

/// Main URL checking logic extracted from main() for testing
pub async fn run_urlcheck_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cli_config = cli_to_config(cli);

    // Load, merge and validate configuration before any work starts
    let config = load_and_merge_config(&cli_config)?;
    config.validate()?;

    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);
    logging::log_config_info(&config);

    let targets = load_targets(cli.file.as_deref());
    if targets.is_empty() {
        println!("No URLs to check.");
        return Ok(exit_codes::SUCCESS);
    }

    let settings = config.run_settings();
    if output_settings.should_show_run_info() {
        output::display_run_start(targets.len(), &settings);
    }

    let dispatcher = Dispatcher::new(Checker::from_config(&config)?);
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let progress = create_progress_reporter(&output_settings, targets.len());
    let sink = progress
        .clone()
        .map(|reporter| reporter as Arc<dyn ProgressSink>);

    let started = Instant::now();
    let report = dispatcher
        .run_with(&targets, settings, sink, cancel)
        .await?;
    finalize_progress_reporter(progress.as_deref(), &report);
    logging::log_run_complete(&report, started.elapsed().as_millis());

    output::display_report(&report, &output_settings.output_format, output_settings.quiet)?;

    let output_path = config
        .output_path
        .as_deref()
        .unwrap_or(defaults::OUTPUT_PATH);
    let rows = reporting::write_report(&report, output_path).inspect_err(|e| {
        logging::log_error(&format!("Could not write report to '{output_path}'"), Some(e));
    })?;
    if output_settings.should_show_run_info() {
        output::display_report_saved(output_path, rows);
    }

    Ok(determine_exit_code(&report))
}

/// Load configuration from file or standard location and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_location()?
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn should_show_run_info(&self) -> bool {
        !self.quiet && self.output_format == output_formats::TEXT
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config.output_format().to_string();
    let show_progress = !quiet && !config.no_progress.unwrap_or(false);

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Read targets from the input file; a missing or unreadable file yields none
pub fn load_targets(file: Option<&str>) -> Vec<UrlTarget> {
    let Some(file) = file else {
        return Vec::new();
    };

    match load_urls_from_file(file) {
        Ok(targets) => {
            logging::log_input_info(targets.len(), file);
            targets
        }
        Err(e) => {
            eprintln!("Error loading URLs from file: {e}");
            Vec::new()
        }
    }
}

/// Create a progress reporter when progress is wanted and stderr is a terminal
pub fn create_progress_reporter(
    output_settings: &OutputSettings,
    total: usize,
) -> Option<Arc<ProgressReporter>> {
    if !output_settings.show_progress
        || output_settings.output_format != output_formats::TEXT
        || !atty::is(atty::Stream::Stderr)
    {
        return None;
    }

    let mut reporter = ProgressReporter::new(true);
    reporter.start_url_checks(total);
    Some(Arc::new(reporter))
}

/// Stop the progress bar and clear it
pub fn finalize_progress_reporter(progress: Option<&ProgressReporter>, report: &BatchReport) {
    if let Some(progress) = progress {
        if report.cancelled() {
            progress.log_warning("Interrupted, showing partial results");
        }
        progress.finish_url_checks(report.working(), report.total());
        progress.finish_and_clear();
    }
}

/// Cancel the run on Ctrl-C; in-flight checks finish, nothing new starts
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, waiting for in-flight checks to finish...");
            cancel.cancel();
        }
    });
}

/// 130 when interrupted, 1 when anything is broken or erroring, 0 otherwise
pub fn determine_exit_code(report: &BatchReport) -> i32 {
    if report.cancelled() {
        exit_codes::INTERRUPTED
    } else if report.has_failures() {
        exit_codes::FAILURE
    } else {
        exit_codes::SUCCESS
    }
}
