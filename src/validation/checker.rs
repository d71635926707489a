use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use tokio::time::{Duration, Instant};

use crate::config::Config;
use crate::core::UrlTarget;
use crate::core::constants::http_status;
use crate::core::error::Result;
use crate::validation::outcome::{CheckKind, CheckOutcome};
use crate::validation::probe::{HttpProbe, ProbeError, ProbeResponse, ReqwestProbe};
use crate::validation::strategy::{HeadThenGet, ResolveStrategy};

/// Checks one target end to end.
///
/// Implementations never fail: every problem is encoded in the returned
/// [`CheckOutcome`].
#[async_trait]
pub trait CheckUrl: Send + Sync {
    async fn check(&self, target: &UrlTarget, timeout: Duration, verify_tls: bool)
    -> CheckOutcome;
}

/// The production checker: a method plan from `R`, requests through `P`.
#[derive(Debug, Clone)]
pub struct Checker<P = ReqwestProbe, R = HeadThenGet> {
    probe: P,
    resolver: R,
}

impl Checker {
    /// Reqwest-backed checker using the User-Agent and GET-only hosts of `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let probe = ReqwestProbe::new(config.user_agent())?;
        let resolver = match config.get_only_hosts {
            Some(ref hosts) => HeadThenGet::with_get_only_hosts(hosts),
            None => HeadThenGet::new(),
        };
        Ok(Self::new(probe, resolver))
    }
}

impl<P: HttpProbe, R: ResolveStrategy> Checker<P, R> {
    pub fn new(probe: P, resolver: R) -> Self {
        Self { probe, resolver }
    }
}

#[async_trait]
impl<P: HttpProbe, R: ResolveStrategy> CheckUrl for Checker<P, R> {
    async fn check(
        &self,
        target: &UrlTarget,
        timeout: Duration,
        verify_tls: bool,
    ) -> CheckOutcome {
        if target.is_blank() {
            return CheckOutcome::error(target.url(), CheckKind::InvalidUrl, "empty URL", 0);
        }
        if let Err(message) = ensure_http_url(target.url()) {
            return CheckOutcome::error(target.url(), CheckKind::InvalidUrl, message, 0);
        }

        let plan = self.resolver.resolve(target);
        let last = plan.len() - 1;
        let mut terminal = None;

        for (attempt, method) in plan.iter().enumerate() {
            let started = Instant::now();
            let result = self
                .probe
                .send(method, target.url(), timeout, verify_tls)
                .await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            if attempt < last && is_method_rejection(&result) {
                debug!("{} rejected {method}, falling back", target.url());
                continue;
            }

            terminal = Some((result, elapsed_ms));
            break;
        }

        let Some((result, elapsed_ms)) = terminal else {
            return CheckOutcome::error(
                target.url(),
                CheckKind::Other("no request method available".to_string()),
                "no request method available",
                0,
            );
        };

        into_outcome(target, result, elapsed_ms)
    }
}

/// True when the attempt failed in a way specific to the method used.
fn is_method_rejection(result: &std::result::Result<ProbeResponse, ProbeError>) -> bool {
    match result {
        Ok(response) => matches!(
            response.status_code,
            http_status::METHOD_NOT_ALLOWED | http_status::NOT_IMPLEMENTED
        ),
        Err(ProbeError::Rejected(_)) => true,
        Err(_) => false,
    }
}

fn ensure_http_url(url: &str) -> std::result::Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| format!("malformed URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err("URL has no host".to_string());
    }
    Ok(())
}

fn into_outcome(
    target: &UrlTarget,
    result: std::result::Result<ProbeResponse, ProbeError>,
    elapsed_ms: u64,
) -> CheckOutcome {
    let url = target.url();
    match result {
        Ok(response)
            if (http_status::MIN..=http_status::MAX).contains(&response.status_code) =>
        {
            CheckOutcome::success(
                url,
                response.status_code,
                response.reason,
                elapsed_ms,
                response.redirect_chain,
            )
        }
        Ok(response) => {
            let message = format!("invalid HTTP status code {}", response.status_code);
            CheckOutcome::error(url, CheckKind::Other(message.clone()), message, elapsed_ms)
        }
        Err(ProbeError::Timeout(message)) => {
            CheckOutcome::error(url, CheckKind::Timeout, message, elapsed_ms)
        }
        Err(ProbeError::Connect(message)) => {
            CheckOutcome::error(url, CheckKind::ConnectionFailed, message, elapsed_ms)
        }
        Err(err @ ProbeError::TooManyRedirects(_)) => {
            CheckOutcome::error(url, CheckKind::TooManyRedirects, err.to_string(), elapsed_ms)
        }
        Err(ProbeError::InvalidUrl(message)) => {
            CheckOutcome::error(url, CheckKind::InvalidUrl, message, elapsed_ms)
        }
        Err(err @ (ProbeError::Tls(_) | ProbeError::Rejected(_) | ProbeError::Other(_))) => {
            let message = err.to_string();
            CheckOutcome::error(url, CheckKind::Other(message.clone()), message, elapsed_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::validation::outcome::CheckStatus;
    use crate::validation::strategy::{Method, MethodPlan};
    use mockito::Server;
    use std::sync::Mutex;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Probe answering from a script and remembering which methods were used.
    struct ScriptedProbe {
        head: std::result::Result<ProbeResponse, ProbeError>,
        get: std::result::Result<ProbeResponse, ProbeError>,
        calls: Mutex<Vec<Method>>,
    }

    impl ScriptedProbe {
        fn new(
            head: std::result::Result<ProbeResponse, ProbeError>,
            get: std::result::Result<ProbeResponse, ProbeError>,
        ) -> Self {
            Self {
                head,
                get,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Method> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpProbe for ScriptedProbe {
        async fn send(
            &self,
            method: Method,
            _url: &str,
            _timeout: Duration,
            _verify_tls: bool,
        ) -> std::result::Result<ProbeResponse, ProbeError> {
            self.calls.lock().unwrap().push(method);
            match method {
                Method::Head => self.head.clone(),
                Method::Get => self.get.clone(),
            }
        }
    }

    fn response(status_code: u16) -> std::result::Result<ProbeResponse, ProbeError> {
        Ok(ProbeResponse {
            status_code,
            reason: "scripted".to_string(),
            redirect_chain: vec![],
        })
    }

    fn reqwest_checker() -> Checker {
        Checker::from_config(&Config::default()).expect("client builds")
    }

    #[tokio::test]
    async fn test_check__empty_url_is_invalid_without_io() {
        let probe = ScriptedProbe::new(response(200), response(200));
        let checker = Checker::new(probe, HeadThenGet::new());

        for raw in ["", "   ", "\t\n"] {
            let outcome = checker.check(&UrlTarget::new(raw), TIMEOUT, true).await;
            assert_eq!(outcome.error_kind(), Some(&CheckKind::InvalidUrl));
            assert_eq!(outcome.elapsed_ms(), 0);
        }
        assert!(checker.probe.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check__unsupported_scheme_is_invalid_without_io() {
        let probe = ScriptedProbe::new(response(200), response(200));
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("ftp://example.com/file"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.error_kind(), Some(&CheckKind::InvalidUrl));
        assert!(outcome.reason().contains("ftp"));
        assert!(checker.probe.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check__head_success_skips_get() {
        let probe = ScriptedProbe::new(response(200), response(500));
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/ok"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(checker.probe.calls(), vec![Method::Head]);
    }

    #[tokio::test]
    async fn test_check__method_not_allowed_falls_back_to_get() {
        let probe = ScriptedProbe::new(response(405), response(200));
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(checker.probe.calls(), vec![Method::Head, Method::Get]);
    }

    #[tokio::test]
    async fn test_check__not_implemented_falls_back_to_get() {
        let probe = ScriptedProbe::new(response(501), response(404));
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(404));
        assert_eq!(checker.probe.calls(), vec![Method::Head, Method::Get]);
    }

    #[tokio::test]
    async fn test_check__transport_rejection_of_head_falls_back_to_get() {
        let probe = ScriptedProbe::new(
            Err(ProbeError::Rejected("connection closed before message completed".to_string())),
            response(200),
        );
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert!(!outcome.is_error());
        assert_eq!(outcome.status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_check__rejection_on_last_method_is_other() {
        let probe = ScriptedProbe::new(
            Err(ProbeError::Rejected("closed".to_string())),
            Err(ProbeError::Rejected("closed again".to_string())),
        );
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert!(matches!(outcome.error_kind(), Some(CheckKind::Other(_))));
        assert!(outcome.reason().contains("closed again"));
    }

    #[tokio::test]
    async fn test_check__method_not_allowed_on_get_is_broken_response() {
        let probe = ScriptedProbe::new(response(405), response(405));
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(405));
        assert_eq!(outcome.bucket(), crate::validation::Bucket::Broken);
    }

    #[tokio::test]
    async fn test_check__transport_failures_do_not_fall_back() {
        let cases = vec![
            (ProbeError::Timeout("slow".to_string()), CheckKind::Timeout),
            (ProbeError::Connect("refused".to_string()), CheckKind::ConnectionFailed),
            (ProbeError::TooManyRedirects(10), CheckKind::TooManyRedirects),
            (ProbeError::InvalidUrl("bad".to_string()), CheckKind::InvalidUrl),
        ];

        for (error, expected_kind) in cases {
            let probe = ScriptedProbe::new(Err(error), response(200));
            let checker = Checker::new(probe, HeadThenGet::new());

            let outcome = checker
                .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
                .await;

            assert_eq!(outcome.error_kind(), Some(&expected_kind));
            assert_eq!(checker.probe.calls(), vec![Method::Head]);
        }
    }

    #[tokio::test]
    async fn test_check__tls_failure_is_other_with_cause() {
        let probe = ScriptedProbe::new(
            Err(ProbeError::Tls("invalid peer certificate".to_string())),
            response(200),
        );
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://self-signed.test/"), TIMEOUT, true)
            .await;

        match outcome.status {
            CheckStatus::Error {
                kind: CheckKind::Other(ref msg),
                ref message,
                ..
            } => {
                assert!(msg.contains("certificate"));
                assert_eq!(msg, message);
            }
            ref other => panic!("expected Other error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check__out_of_range_status_is_other() {
        let probe = ScriptedProbe::new(response(799), response(200));
        let checker = Checker::new(probe, HeadThenGet::new());

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert!(matches!(outcome.error_kind(), Some(CheckKind::Other(_))));
    }

    #[tokio::test]
    async fn test_check__custom_resolver_is_consulted() {
        struct GetOnly;
        impl ResolveStrategy for GetOnly {
            fn resolve(&self, _target: &UrlTarget) -> MethodPlan {
                MethodPlan::get_only()
            }
        }

        let probe = ScriptedProbe::new(response(405), response(200));
        let checker = Checker::new(probe, GetOnly);

        let outcome = checker
            .check(&UrlTarget::new("https://example.test/"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(checker.probe.calls(), vec![Method::Get]);
    }

    #[tokio::test]
    async fn test_check__real_server_rejecting_head_yields_success() -> TestResult {
        let mut server = Server::new_async().await;
        let head = server
            .mock("HEAD", "/no-head")
            .with_status(405)
            .expect(1)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/no-head")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let outcome = reqwest_checker()
            .check(&UrlTarget::new(server.url() + "/no-head"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(200));
        assert!(!outcome.is_error());
        head.assert_async().await;
        get.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_check__real_server_404_is_success_variant() -> TestResult {
        let mut server = Server::new_async().await;
        let _head = server.mock("HEAD", "/missing").with_status(404).create_async().await;
        let get = server
            .mock("GET", "/missing")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let outcome = reqwest_checker()
            .check(&UrlTarget::new(server.url() + "/missing"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(404));
        assert_eq!(outcome.reason(), "Not Found");
        get.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_check__get_only_host_never_sends_head() -> TestResult {
        let mut server = Server::new_async().await;
        let head = server
            .mock("HEAD", "/page")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;
        let _get = server.mock("GET", "/page").with_status(200).create_async().await;

        let config = Config {
            get_only_hosts: Some(vec!["127.0.0.1".to_string()]),
            ..Default::default()
        };
        let checker = Checker::from_config(&config)?;

        let outcome = checker
            .check(&UrlTarget::new(server.url() + "/page"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(200));
        head.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_check__redirect_chain_is_reported() -> TestResult {
        let mut server = Server::new_async().await;
        let _old = server
            .mock("HEAD", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let _new = server.mock("HEAD", "/new").with_status(200).create_async().await;

        let outcome = reqwest_checker()
            .check(&UrlTarget::new(server.url() + "/old"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(outcome.redirect_chain(), &[server.url() + "/new"]);
        assert_eq!(outcome.final_url(), server.url() + "/new");
        Ok(())
    }

    #[tokio::test]
    async fn test_check__redirect_loop_is_too_many_redirects() -> TestResult {
        let mut server = Server::new_async().await;
        let _loop = server
            .mock("HEAD", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect_at_least(1)
            .create_async()
            .await;

        let outcome = reqwest_checker()
            .check(&UrlTarget::new(server.url() + "/loop"), TIMEOUT, true)
            .await;

        assert_eq!(outcome.error_kind(), Some(&CheckKind::TooManyRedirects));
        Ok(())
    }

    #[tokio::test]
    async fn test_check__connection_refused() -> TestResult {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);

        let outcome = reqwest_checker()
            .check(
                &UrlTarget::new(format!("http://127.0.0.1:{port}/nowhere")),
                TIMEOUT,
                true,
            )
            .await;

        assert_eq!(outcome.error_kind(), Some(&CheckKind::ConnectionFailed));
        Ok(())
    }

    #[tokio::test]
    async fn test_check__silent_server_times_out_near_timeout() -> TestResult {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        // Accept connections and never answer
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let timeout = Duration::from_millis(500);
        let outcome = reqwest_checker()
            .check(
                &UrlTarget::new(format!("http://127.0.0.1:{port}/hang")),
                timeout,
                true,
            )
            .await;
        silent.abort();

        assert_eq!(outcome.error_kind(), Some(&CheckKind::Timeout));
        let elapsed = outcome.elapsed_ms();
        assert!((450..1500).contains(&elapsed), "elapsed {elapsed}ms");
        Ok(())
    }
}
