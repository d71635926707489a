//! Application-wide constants to avoid magic values throughout the codebase.

/// Output format constants
pub mod output_formats {
    /// Text output format - coloured sections plus a summary
    pub const TEXT: &str = "text";
    /// JSON output format - the serialized batch report
    pub const JSON: &str = "json";
    /// Minimal output format - one line per problem URL, no colours
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// HTTP status code constants
pub mod http_status {
    /// Lowest valid HTTP status code
    pub const MIN: u16 = 100;
    /// Highest valid HTTP status code
    pub const MAX: u16 = 599;
    /// First status code classified as working
    pub const WORKING_MIN: u16 = 200;
    /// First status code classified as broken
    pub const BROKEN_THRESHOLD: u16 = 400;
    /// HTTP 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    /// HTTP 501 Not Implemented
    pub const NOT_IMPLEMENTED: u16 = 501;
}

/// Redirect handling constants
pub mod redirects {
    /// Maximum number of redirects followed per attempt
    pub const MAX_REDIRECTS: usize = 10;
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
    /// Maximum accepted timeout in seconds (24 hours)
    pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;
}

/// Default configuration values
pub mod defaults {
    /// Default number of concurrent checks
    pub const MAX_CONCURRENCY: usize = 10;
    /// Upper bound on concurrent checks
    pub const MAX_CONCURRENCY_LIMIT: usize = 1000;
    /// Certificates are verified unless explicitly disabled
    pub const VERIFY_TLS: bool = true;
    /// Default CSV report path
    pub const OUTPUT_PATH: &str = "url_check_results.csv";
    /// Config file looked up in the working directory
    pub const CONFIG_FILE_NAME: &str = ".urlcheck.toml";
    /// Default User-Agent header
    pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
}

/// Process exit codes
pub mod exit_codes {
    /// Every URL is working
    pub const SUCCESS: i32 = 0;
    /// At least one URL is broken or erroring, or the run failed
    pub const FAILURE: i32 = 1;
    /// The run was interrupted (128 + SIGINT)
    pub const INTERRUPTED: i32 = 130;
}

/// Display and formatting constants
pub mod display {
    /// Marker for working URLs
    pub const WORKING_MARK: &str = "✓";
    /// Marker for broken URLs
    pub const BROKEN_MARK: &str = "✗";
    /// Marker for erroring URLs
    pub const ERROR_MARK: &str = "!";
}
