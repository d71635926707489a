//! Console output for urlcheck

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::io::{self, Write};

use crate::config::RunSettings;
use crate::core::constants::output_formats;
use crate::core::error::Result;
use crate::ui::color::{Colors, bucket_color, bucket_symbol, colorize};
use crate::validation::{BatchReport, Bucket, CheckOutcome};

#[derive(Serialize)]
struct JsonOutput<'a> {
    checked_at: String,
    #[serde(flatten)]
    report: &'a BatchReport,
}

/// Announce a run before it starts
pub fn display_run_start(total: usize, settings: &RunSettings) {
    println!(
        "{} {} URLs with {} workers (timeout {}s{})...",
        colorize("Checking", Colors::BRIGHT_CYAN),
        colorize(&total.to_string(), Colors::BRIGHT_WHITE),
        settings.max_concurrency,
        settings.timeout.as_secs(),
        if settings.verify_tls {
            ""
        } else {
            ", TLS verification off"
        }
    );
}

/// Print the report to stdout in the requested format
pub fn display_report(report: &BatchReport, output_format: &str, quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, output_format, quiet)
}

/// Render the report in the requested format
pub fn write_report<W: Write>(
    out: &mut W,
    report: &BatchReport,
    output_format: &str,
    quiet: bool,
) -> Result<()> {
    match output_format {
        output_formats::MINIMAL => write_minimal(out, report)?,
        output_formats::JSON => write_json(out, report)?,
        _ => write_text(out, report, quiet)?,
    }
    Ok(())
}

/// One line per URL: status code (or error label) and URL
fn write_minimal<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    for outcome in report.outcomes() {
        match (outcome.status_code(), outcome.error_kind()) {
            (Some(code), _) => writeln!(out, "{code} {}", outcome.url)?,
            (None, Some(kind)) => writeln!(out, "{} {}", kind.label(), outcome.url)?,
            (None, None) => writeln!(out, "error {}", outcome.url)?,
        }
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, report: &BatchReport) -> Result<()> {
    let output = JsonOutput {
        checked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        report,
    };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

fn write_text<W: Write>(out: &mut W, report: &BatchReport, quiet: bool) -> io::Result<()> {
    if !quiet {
        writeln!(out, "\n===== URL CHECK RESULTS =====")?;
        for (bucket, heading) in [
            (Bucket::Working, "WORKING URLs"),
            (Bucket::Broken, "BROKEN URLs"),
            (Bucket::Error, "ERRORS"),
        ] {
            let count = report.in_bucket(bucket).count();
            writeln!(
                out,
                "\n{}",
                colorize(&format!("{heading}: {count}"), bucket_color(bucket))
            )?;
            for outcome in report.in_bucket(bucket) {
                writeln!(out, "  {}", format_row(bucket, outcome))?;
            }
        }
    }

    write_summary(out, report)
}

fn format_row(bucket: Bucket, outcome: &CheckOutcome) -> String {
    let symbol = colorize(bucket_symbol(bucket), bucket_color(bucket));
    let redirect = if outcome.redirect_chain().is_empty() {
        String::new()
    } else {
        format!(" -> {}", outcome.final_url())
    };
    match bucket {
        Bucket::Working => format!("{symbol} {outcome}{redirect}"),
        Bucket::Broken => format!(
            "{symbol} {} - {} {}{redirect}",
            outcome.url,
            outcome.status_code().unwrap_or_default(),
            outcome.reason()
        ),
        Bucket::Error => format!("{symbol} {outcome}"),
    }
}

fn write_summary<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    writeln!(
        out,
        "\n{}",
        colorize(
            &format!("{}===== SUMMARY ====={}", Colors::BOLD, Colors::RESET),
            Colors::BRIGHT_CYAN
        )
    )?;
    writeln!(out, "Total URLs checked: {}", report.total())?;
    for (label, count) in [
        ("Working", report.working()),
        ("Broken", report.broken()),
        ("Errors", report.errors()),
    ] {
        writeln!(out, "{label}: {count} ({:.1}%)", report.percentage(count))?;
    }
    if report.cancelled() {
        writeln!(
            out,
            "{}",
            colorize(
                "Run cancelled before every URL was checked",
                Colors::BRIGHT_YELLOW
            )
        )?;
    }
    Ok(())
}

/// Confirm where the CSV report went
pub fn display_report_saved(path: &str, rows: usize) {
    println!("Report saved to {path} ({rows} rows)");
}
