//! Reporting
//!
//! CSV report output and structured logging for the application.

pub mod csv;
pub mod logging;

// Re-export commonly used items
pub use self::csv::{CSV_HEADERS, write_report, write_report_to};
