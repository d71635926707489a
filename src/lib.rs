//! Bulk URL status checking.
//!
//! Targets are checked concurrently with a bounded number in flight. Each
//! check tries HEAD first and falls back to GET when the server rejects
//! the method; every outcome lands in one of three buckets of a
//! [`BatchReport`]: working (status 200 to 399), broken (any other status)
//! or error (no HTTP response at all).
//!
//! ```no_run
//! use urlcheck::{Checker, Config, Dispatcher, UrlTarget};
//!
//! # async fn run() -> urlcheck::Result<()> {
//! let config = Config::default();
//! let dispatcher = Dispatcher::new(Checker::from_config(&config)?);
//! let targets = UrlTarget::from_raw_list(["example.com", "https://example.org/missing"]);
//! let report = dispatcher.run(&targets, config.run_settings()).await?;
//! println!("{} working, {} broken, {} errors", report.working(), report.broken(), report.errors());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod input;
pub mod reporting;
pub mod ui;
pub mod validation;

pub use crate::config::{CliConfig, Config, RunSettings};
pub use crate::core::{Result, UrlCheckError, UrlTarget};
pub use crate::validation::{
    BatchReport, Bucket, CheckKind, CheckOutcome, CheckUrl, Checker, Dispatcher, ProgressSink,
};
