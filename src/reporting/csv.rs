//! CSV report writer
//!
//! One row per checked URL, grouped working, broken, then errors.

use csv::Writer;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::error::Result;
use crate::validation::{BatchReport, Bucket, CheckOutcome};

/// Column order of the CSV report.
pub const CSV_HEADERS: [&str; 8] = [
    "url",
    "status_code",
    "reason",
    "response_time",
    "is_error",
    "error_type",
    "redirected",
    "redirect_url",
];

const BUCKET_ORDER: [Bucket; 3] = [Bucket::Working, Bucket::Broken, Bucket::Error];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    status_code: Option<u16>,
    reason: &'a str,
    response_time: String,
    is_error: bool,
    error_type: &'a str,
    redirected: bool,
    redirect_url: &'a str,
}

impl<'a> From<&'a CheckOutcome> for CsvRow<'a> {
    fn from(outcome: &'a CheckOutcome) -> Self {
        let redirected = !outcome.redirect_chain().is_empty();
        Self {
            url: &outcome.url,
            status_code: outcome.status_code(),
            reason: outcome.reason(),
            response_time: format!("{:.2}", outcome.elapsed_ms() as f64 / 1000.0),
            is_error: outcome.is_error(),
            error_type: outcome.error_kind().map_or("", |kind| kind.label()),
            redirected,
            redirect_url: if redirected { outcome.final_url() } else { "" },
        }
    }
}

/// Write `report` as CSV to `path`, returning the number of rows written.
pub fn write_report<P: AsRef<Path>>(report: &BatchReport, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let rows = write_report_to(report, file)?;
    info!("Report saved to {}", path.display());
    Ok(rows)
}

/// Write `report` as CSV to any writer.
pub fn write_report_to<W: Write>(report: &BatchReport, writer: W) -> Result<usize> {
    let mut writer = Writer::from_writer(writer);
    if report.total() == 0 {
        // serialize() only emits the header along with the first row
        writer.write_record(CSV_HEADERS)?;
    }

    let mut rows = 0;
    for bucket in BUCKET_ORDER {
        for outcome in report.in_bucket(bucket) {
            writer.serialize(CsvRow::from(outcome))?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}
