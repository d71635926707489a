use std::fmt;

/// Error types for urlcheck operations.
///
/// Per-URL failures never show up here: they are data on a
/// [`CheckOutcome`](crate::validation::CheckOutcome). This type covers the
/// conditions that stop a run (or the CLI) altogether.
#[derive(Debug)]
pub enum UrlCheckError {
    /// IO error (reading URL lists, writing reports)
    Io(std::io::Error),

    /// Configuration error, detected before any check starts
    Config(String),

    /// HTTP client construction error
    Http(reqwest::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// CSV report error
    Csv(csv::Error),

    /// JSON serialization error
    Json(serde_json::Error),
}

impl fmt::Display for UrlCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlCheckError::Io(err) => write!(f, "IO error: {err}"),
            UrlCheckError::Config(msg) => write!(f, "Configuration error: {msg}"),
            UrlCheckError::Http(err) => write!(f, "HTTP error: {err}"),
            UrlCheckError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            UrlCheckError::Csv(err) => write!(f, "CSV error: {err}"),
            UrlCheckError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for UrlCheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UrlCheckError::Io(err) => Some(err),
            UrlCheckError::Http(err) => Some(err),
            UrlCheckError::TomlParsing(err) => Some(err),
            UrlCheckError::Csv(err) => Some(err),
            UrlCheckError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UrlCheckError {
    fn from(err: std::io::Error) -> Self {
        UrlCheckError::Io(err)
    }
}

impl From<reqwest::Error> for UrlCheckError {
    fn from(err: reqwest::Error) -> Self {
        UrlCheckError::Http(err)
    }
}

impl From<toml::de::Error> for UrlCheckError {
    fn from(err: toml::de::Error) -> Self {
        UrlCheckError::TomlParsing(err)
    }
}

impl From<csv::Error> for UrlCheckError {
    fn from(err: csv::Error) -> Self {
        UrlCheckError::Csv(err)
    }
}

impl From<serde_json::Error> for UrlCheckError {
    fn from(err: serde_json::Error) -> Self {
        UrlCheckError::Json(err)
    }
}

/// Type alias for Results using UrlCheckError
pub type Result<T> = std::result::Result<T, UrlCheckError>;
