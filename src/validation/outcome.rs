use serde::Serialize;
use std::fmt;

use crate::core::constants::http_status;

/// Why a check produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum CheckKind {
    /// No response within the configured timeout
    Timeout,
    /// The host could not be resolved or the connection was refused
    ConnectionFailed,
    /// More redirects than the redirect bound allows
    TooManyRedirects,
    /// The target is not a usable http(s) URL
    InvalidUrl,
    /// Any other transport failure, with a human readable cause
    Other(String),
}

impl CheckKind {
    /// Stable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Timeout => "timeout",
            CheckKind::ConnectionFailed => "connection_failed",
            CheckKind::TooManyRedirects => "too_many_redirects",
            CheckKind::InvalidUrl => "invalid_url",
            CheckKind::Other(_) => "other",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Timeout => write!(f, "Timeout"),
            CheckKind::ConnectionFailed => write!(f, "Connection failed"),
            CheckKind::TooManyRedirects => write!(f, "Too many redirects"),
            CheckKind::InvalidUrl => write!(f, "Invalid URL"),
            CheckKind::Other(msg) => write!(f, "Other: {msg}"),
        }
    }
}

/// Either the response that was received or the reason there was none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckStatus {
    Success {
        status_code: u16,
        reason: String,
        elapsed_ms: u64,
        redirect_chain: Vec<String>,
    },
    Error {
        kind: CheckKind,
        message: String,
        elapsed_ms: u64,
    },
}

/// Classification bucket of a finished check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Working,
    Broken,
    Error,
}

/// Result of checking one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub url: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl CheckOutcome {
    /// Outcome for a received HTTP response.
    pub fn success(
        url: impl Into<String>,
        status_code: u16,
        reason: impl Into<String>,
        elapsed_ms: u64,
        redirect_chain: Vec<String>,
    ) -> Self {
        debug_assert!((http_status::MIN..=http_status::MAX).contains(&status_code));
        Self {
            url: url.into(),
            status: CheckStatus::Success {
                status_code,
                reason: reason.into(),
                elapsed_ms,
                redirect_chain,
            },
        }
    }

    /// Outcome for a check that got no HTTP response.
    pub fn error(
        url: impl Into<String>,
        kind: CheckKind,
        message: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            url: url.into(),
            status: CheckStatus::Error {
                kind,
                message: message.into(),
                elapsed_ms,
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, CheckStatus::Error { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.status {
            CheckStatus::Success { status_code, .. } => Some(status_code),
            CheckStatus::Error { .. } => None,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.status {
            CheckStatus::Success { elapsed_ms, .. } | CheckStatus::Error { elapsed_ms, .. } => {
                elapsed_ms
            }
        }
    }

    pub fn error_kind(&self) -> Option<&CheckKind> {
        match &self.status {
            CheckStatus::Error { kind, .. } => Some(kind),
            CheckStatus::Success { .. } => None,
        }
    }

    /// Reason phrase for responses, cause for errors.
    pub fn reason(&self) -> &str {
        match &self.status {
            CheckStatus::Success { reason, .. } => reason,
            CheckStatus::Error { message, .. } => message,
        }
    }

    pub fn redirect_chain(&self) -> &[String] {
        match &self.status {
            CheckStatus::Success { redirect_chain, .. } => redirect_chain,
            CheckStatus::Error { .. } => &[],
        }
    }

    /// Where the check ended up after redirects.
    pub fn final_url(&self) -> &str {
        self.redirect_chain().last().map_or(&self.url, String::as_str)
    }

    pub fn bucket(&self) -> Bucket {
        match self.status {
            CheckStatus::Success { status_code, .. }
                if (http_status::WORKING_MIN..http_status::BROKEN_THRESHOLD)
                    .contains(&status_code) =>
            {
                Bucket::Working
            }
            CheckStatus::Success { .. } => Bucket::Broken,
            CheckStatus::Error { .. } => Bucket::Error,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.status {
            CheckStatus::Success {
                status_code,
                reason,
                elapsed_ms,
                ..
            } => write!(
                f,
                "{} - {} {} ({:.2}s)",
                &self.url,
                status_code,
                reason,
                *elapsed_ms as f64 / 1000.0
            ),
            CheckStatus::Error { kind, message, .. } => {
                write!(f, "{} - {}: {}", &self.url, kind.label(), message)
            }
        }
    }
}
