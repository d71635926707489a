//! The network boundary: one HTTP attempt, redirects included.
//!
//! [`HttpProbe`] is the only place a request is performed. Transport
//! failures are turned into a [`ProbeError`] right here, so nothing from
//! reqwest leaks into the checker.

use async_trait::async_trait;
use log::trace;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use std::error::Error as StdError;
use std::fmt;
use tokio::time::Duration;

use crate::core::constants::redirects;
use crate::core::error::Result;
use crate::validation::strategy::Method;

/// A received HTTP response, after following redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub reason: String,
    /// Every URL redirected to, in order; the last one answered.
    pub redirect_chain: Vec<String>,
}

/// Why an attempt produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The attempt exceeded its timeout
    Timeout(String),
    /// DNS resolution or TCP connect failed
    Connect(String),
    /// TLS handshake or certificate failure
    Tls(String),
    /// The redirect bound was exceeded
    TooManyRedirects(usize),
    /// The URL (or a redirect location) is malformed
    InvalidUrl(String),
    /// The server dropped or garbled the exchange for this request
    Rejected(String),
    Other(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Timeout(msg) => write!(f, "timed out: {msg}"),
            ProbeError::Connect(msg) => write!(f, "connection failed: {msg}"),
            ProbeError::Tls(msg) => write!(f, "TLS error: {msg}"),
            ProbeError::TooManyRedirects(max) => write!(f, "exceeded {max} redirects"),
            ProbeError::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            ProbeError::Rejected(msg) => write!(f, "request rejected: {msg}"),
            ProbeError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for ProbeError {}

/// Capability to perform one HTTP request with method, timeout,
/// TLS-verification and redirect following.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
        verify_tls: bool,
    ) -> std::result::Result<ProbeResponse, ProbeError>;
}

/// [`HttpProbe`] backed by reqwest.
///
/// Holds one verifying and one permissive client so the TLS setting can be
/// chosen per call; both pool connections internally.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    verifying: Client,
    permissive: Client,
    max_redirects: usize,
}

impl ReqwestProbe {
    pub fn new(user_agent: &str) -> Result<Self> {
        Ok(Self {
            verifying: Self::build_client(user_agent, true)?,
            permissive: Self::build_client(user_agent, false)?,
            max_redirects: redirects::MAX_REDIRECTS,
        })
    }

    /// Override the redirect bound (default 10).
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    fn build_client(user_agent: &str, verify_tls: bool) -> Result<Client> {
        let mut client_builder = Client::builder()
            // Redirects are followed by hand so the chain can be reported
            .redirect(Policy::none())
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60));

        if !verify_tls {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        Ok(client_builder.build()?)
    }

    fn client(&self, verify_tls: bool) -> &Client {
        if verify_tls {
            &self.verifying
        } else {
            &self.permissive
        }
    }

    async fn follow(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
        verify_tls: bool,
    ) -> std::result::Result<ProbeResponse, ProbeError> {
        let client = self.client(verify_tls);
        let mut current = Url::parse(url).map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
        let mut redirect_chain = Vec::new();

        loop {
            let response = client
                .request(method.into(), current.clone())
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| classify_reqwest_error(&e))?;

            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            match location {
                Some(location) if status.is_redirection() => {
                    if redirect_chain.len() >= self.max_redirects {
                        return Err(ProbeError::TooManyRedirects(self.max_redirects));
                    }
                    let next = current.join(&location).map_err(|e| {
                        ProbeError::InvalidUrl(format!("bad redirect location '{location}': {e}"))
                    })?;
                    trace!("{method} {current} -> {} {next}", status.as_u16());
                    redirect_chain.push(next.to_string());
                    current = next;
                }
                _ => {
                    return Ok(ProbeResponse {
                        status_code: status.as_u16(),
                        reason: status.canonical_reason().unwrap_or("").to_string(),
                        redirect_chain,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn send(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
        verify_tls: bool,
    ) -> std::result::Result<ProbeResponse, ProbeError> {
        // The timeout bounds the whole chain, not each hop
        match tokio::time::timeout(timeout, self.follow(method, url, timeout, verify_tls)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(format!(
                "no response within {:.1}s",
                timeout.as_secs_f64()
            ))),
        }
    }
}

/// Map a reqwest error onto the probe taxonomy.
fn classify_reqwest_error(err: &reqwest::Error) -> ProbeError {
    let message = error_chain_message(err);

    if err.is_timeout() {
        ProbeError::Timeout(message)
    } else if err.is_builder() {
        ProbeError::InvalidUrl(message)
    } else if err.is_redirect() {
        ProbeError::TooManyRedirects(redirects::MAX_REDIRECTS)
    } else if is_tls_failure(err) {
        ProbeError::Tls(message)
    } else if err.is_connect() {
        ProbeError::Connect(message)
    } else if err.is_request() || err.is_body() || err.is_decode() {
        ProbeError::Rejected(message)
    } else {
        ProbeError::Other(message)
    }
}

/// Only the sources are inspected; the top-level message embeds the URL.
fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if mentions_tls(&cause.to_string()) {
            return true;
        }
        source = cause.source();
    }
    false
}

fn mentions_tls(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["certificate", "tls", "handshake", "unknownissuer"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Join an error and its sources into one readable line.
pub(crate) fn error_chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|part| part.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}
