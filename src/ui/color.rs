//! Color and symbol utilities for terminal output

use crate::core::constants::display;
use crate::validation::Bucket;

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &'static str = "\x1b[93m";
    pub const BRIGHT_CYAN: &'static str = "\x1b[96m";
    pub const BRIGHT_WHITE: &'static str = "\x1b[97m";
}

/// Apply color to text if terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}", color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Terminal capability detection
pub fn supports_formatting() -> bool {
    use std::env;

    if env::var("NO_COLOR").is_ok() || env::var("FORCE_COLOR").as_deref() == Ok("0") {
        return false;
    }

    if env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Disable formatting when running tests
    if cfg!(test) || env::var("RUST_TEST_TIME_UNIT").is_ok() {
        return false;
    }

    if !atty::is(atty::Stream::Stdout) {
        return false;
    }

    match env::var("TERM") {
        Ok(term) => !(term == "dumb" || term.is_empty()),
        Err(_) => false,
    }
}

/// Color used for a bucket's heading and rows
pub fn bucket_color(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Working => Colors::BRIGHT_GREEN,
        Bucket::Broken => Colors::BRIGHT_RED,
        Bucket::Error => Colors::BRIGHT_YELLOW,
    }
}

/// Marker printed in front of each row of a bucket
pub fn bucket_symbol(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Working => display::WORKING_MARK,
        Bucket::Broken => display::BROKEN_MARK,
        Bucket::Error => display::ERROR_MARK,
    }
}
