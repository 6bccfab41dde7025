//! Content fetching from URLs, files, and stdin.
//!
//! Page downloads are bounded in time (headers and body together) and every
//! failure is classified into a [`TransportKind`], an HTTP status error, or
//! a timeout.

use std::error::Error as StdError;
use std::fs;
use std::future::Future;
use std::io::{self, Read};
use std::time::Duration;

use reqwest::{Client, redirect};
use url::Url;

use crate::error::TransportKind;
use crate::{ReferentError, Result};

/// Desktop Chrome User-Agent sent with page requests.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Maximum number of redirects followed by the shared client.
pub const MAX_REDIRECTS: usize = 10;

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Bound on the whole request, body included, in seconds.
    pub timeout: u64,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: BROWSER_USER_AGENT.to_string() }
    }
}

/// Build the HTTP client shared by the fetcher and the provider gateways.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| ReferentError::Transport { kind: TransportKind::Unknown, message: error_chain(&e) })
}

/// Validate a user supplied page URL.
///
/// The URL is trimmed first. Only `http` and `https` are accepted.
pub fn validate_url(url: &str) -> Result<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ReferentError::MissingField("url"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ReferentError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ReferentError::InvalidUrl(format!("unsupported scheme '{}', expected http or https", other))),
    }
}

/// Fetches HTML content from a URL.
///
/// Performs a GET with browser-like headers, follows up to
/// [`MAX_REDIRECTS`] redirects and gives up after `config.timeout` seconds.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    fetch_url_with_cancel(url, config, std::future::pending()).await
}

/// Like [`fetch_url`], but stops with [`ReferentError::Timeout`] as soon as
/// `cancel` completes.
pub async fn fetch_url_with_cancel(url: &str, config: &FetchConfig, cancel: impl Future<Output = ()>) -> Result<String> {
    let client = http_client()?;
    fetch_with_client(&client, url, config, cancel).await
}

/// Fetch a page with an existing client.
pub async fn fetch_with_client(
    client: &Client, url: &str, config: &FetchConfig, cancel: impl Future<Output = ()>,
) -> Result<String> {
    let parsed = validate_url(url)?;
    let bound = Duration::from_secs(config.timeout);

    tracing::debug!(url = %parsed, timeout = config.timeout, "fetching page");

    tokio::select! {
        result = tokio::time::timeout(bound, download(client, parsed, config)) => match result {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(timeout = config.timeout, "page fetch timed out");
                Err(ReferentError::Timeout { timeout: config.timeout })
            }
        },
        _ = cancel => {
            tracing::debug!("page fetch cancelled");
            Err(ReferentError::Timeout { timeout: config.timeout })
        }
    }
}

async fn download(client: &Client, url: Url, config: &FetchConfig) -> Result<String> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, &config.user_agent)
        .header(reqwest::header::ACCEPT, ACCEPT)
        .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
        .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
        .send()
        .await
        .map_err(|e| classify_reqwest_error(e, config))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "page fetch returned an error status");
        return Err(ReferentError::HttpStatus {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        });
    }

    response.text().await.map_err(|e| classify_reqwest_error(e, config))
}

/// Map a reqwest failure to the error taxonomy.
fn classify_reqwest_error(err: reqwest::Error, config: &FetchConfig) -> ReferentError {
    match classify_transport(err) {
        (TransportKind::Timeout, _) => ReferentError::Timeout { timeout: config.timeout },
        (kind, message) => ReferentError::Transport { kind, message },
    }
}

/// Transport kind and rendered message of a reqwest failure.
///
/// Structured signals are checked first; the rendered error chain is only
/// inspected when they are inconclusive, and always without the request URL
/// so host or path words never decide the kind. The returned message keeps
/// the URL.
pub(crate) fn classify_transport(err: reqwest::Error) -> (TransportKind, String) {
    let message = error_chain(&err);
    let name = error_name(&err);

    if err.is_timeout() {
        return (TransportKind::Timeout, message);
    }
    match io_error_kind(&err) {
        Some(io::ErrorKind::TimedOut) => return (TransportKind::Timeout, message),
        Some(io::ErrorKind::ConnectionRefused) => return (TransportKind::ConnectionRefused, message),
        _ => {}
    }

    match classify_transport_message(&error_chain(&err.without_url()), name) {
        TransportKind::Unknown => (TransportKind::Unknown, format!("{} ({})", message, name)),
        kind => (kind, message),
    }
}

/// Classify a transport failure from its message and error name.
///
/// Matching is case-insensitive and ordered; the first matching group wins.
pub fn classify_transport_message(message: &str, name: &str) -> TransportKind {
    let message = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if name.eq_ignore_ascii_case("AbortError") || has(&["timeout", "timed out", "aborted"]) {
        TransportKind::Timeout
    } else if has(&["cors", "cross-origin"]) {
        TransportKind::Blocked
    } else if has(&["enotfound", "getaddrinfo", "dns", "failed to lookup"]) {
        TransportKind::DnsFailure
    } else if has(&["econnrefused", "connection refused"]) {
        TransportKind::ConnectionRefused
    } else if has(&["certificate", "ssl", "tls"]) {
        TransportKind::TlsFailure
    } else if has(&["fetch failed", "network", "error sending request", "connect"]) {
        TransportKind::NetworkError
    } else {
        TransportKind::Unknown
    }
}

fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = current.source();
    }
    None
}

/// Render an error and all of its sources as one line.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(current) = source {
        rendered.push_str(": ");
        rendered.push_str(&current.to_string());
        source = current.source();
    }
    rendered
}

fn error_name(err: &reqwest::Error) -> &'static str {
    if err.is_connect() {
        "ConnectError"
    } else if err.is_redirect() {
        "RedirectError"
    } else if err.is_body() {
        "BodyError"
    } else if err.is_decode() {
        "DecodeError"
    } else if err.is_request() {
        "RequestError"
    } else {
        "Error"
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Chrome/120.0.0.0"));
    }

    #[rstest]
    #[case("https://example.com/article")]
    #[case("  http://example.com  ")]
    fn test_validate_url_accepts_http(#[case] url: &str) {
        assert!(validate_url(url).is_ok());
    }

    #[rstest]
    #[case("not-a-url")]
    #[case("ftp://example.com/file")]
    #[case("file:///etc/passwd")]
    fn test_validate_url_rejects(#[case] url: &str) {
        assert!(matches!(validate_url(url), Err(ReferentError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_url_empty_is_missing() {
        assert!(matches!(validate_url("   "), Err(ReferentError::MissingField("url"))));
    }

    #[rstest]
    #[case("operation timed out", "Error", TransportKind::Timeout)]
    #[case("The operation was aborted", "Error", TransportKind::Timeout)]
    #[case("anything", "AbortError", TransportKind::Timeout)]
    #[case("Blocked by CORS policy", "Error", TransportKind::Blocked)]
    #[case("cross-origin request denied", "Error", TransportKind::Blocked)]
    #[case("getaddrinfo ENOTFOUND example.invalid", "Error", TransportKind::DnsFailure)]
    #[case("dns error: failed to lookup address information", "ConnectError", TransportKind::DnsFailure)]
    #[case("connect ECONNREFUSED 127.0.0.1:9", "Error", TransportKind::ConnectionRefused)]
    #[case("invalid peer certificate: UnknownIssuer", "ConnectError", TransportKind::TlsFailure)]
    #[case("SSL routines failed", "Error", TransportKind::TlsFailure)]
    #[case("fetch failed", "TypeError", TransportKind::NetworkError)]
    #[case("error sending request for url", "RequestError", TransportKind::NetworkError)]
    #[case("something odd happened", "Error", TransportKind::Unknown)]
    fn test_classify_transport_message(#[case] message: &str, #[case] name: &str, #[case] expected: TransportKind) {
        assert_eq!(classify_transport_message(message, name), expected);
    }

    #[tokio::test]
    async fn test_fetch_url_success_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>ok</body></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fetch_url(&format!("{}/article", server.uri()), &FetchConfig::default()).await.unwrap();
        assert!(body.contains("ok"));

        let requests = server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
        assert_eq!(agent, BROWSER_USER_AGENT);
        assert!(requests[0].headers.get("accept-language").is_some());
    }

    #[tokio::test]
    async fn test_fetch_url_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

        let result = fetch_url(&format!("{}/missing", server.uri()), &FetchConfig::default()).await;
        match result {
            Err(ReferentError::HttpStatus { status, status_text }) => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_url_follows_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
            .mount(&server)
            .await;

        let body = fetch_url(&format!("{}/old", server.uri()), &FetchConfig::default()).await.unwrap();
        assert_eq!(body, "moved here");
    }

    #[tokio::test]
    async fn test_fetch_url_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = FetchConfig { timeout: 1, ..Default::default() };
        let result = fetch_url(&format!("{}/slow", server.uri()), &config).await;
        assert!(matches!(result, Err(ReferentError::Timeout { timeout: 1 })));
    }

    #[tokio::test]
    async fn test_fetch_url_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let cancel = tokio::time::sleep(Duration::from_millis(50));
        let result = fetch_url_with_cancel(&format!("{}/slow", server.uri()), &FetchConfig::default(), cancel).await;
        assert!(matches!(result, Err(ReferentError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_fetch_url_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = fetch_url(&format!("http://127.0.0.1:{}/", port), &FetchConfig::default()).await;
        match result {
            Err(err @ ReferentError::Transport { kind: TransportKind::ConnectionRefused, .. }) => {
                assert_eq!(err.status_code(), 503);
            }
            other => panic!("expected connection refused, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dns_failure_ignores_words_in_url() {
        let result = fetch_url("http://corsair-timeout-news.invalid/ssl/story", &FetchConfig::default()).await;
        match result {
            Err(err @ ReferentError::Transport { kind: TransportKind::DnsFailure, .. }) => {
                assert_eq!(err.status_code(), 404);
            }
            other => panic!("expected DNS failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redirect_loop_not_classified_by_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cors/timeout"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/cors/timeout"))
            .mount(&server)
            .await;

        let result = fetch_url(&format!("{}/cors/timeout", server.uri()), &FetchConfig::default()).await;
        match result {
            Err(ReferentError::Transport { kind, message }) => {
                assert_eq!(kind, TransportKind::Unknown);
                assert!(message.contains("/cors/timeout"));
            }
            other => panic!("expected unclassified transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_url_invalid_scheme_makes_no_request() {
        let result = fetch_url("ftp://example.com/file", &FetchConfig::default()).await;
        assert!(matches!(result, Err(ReferentError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(ReferentError::Io(_))));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let inner = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let outer = io::Error::other(inner);
        assert!(error_chain(&outer).contains("refused"));
        assert_eq!(io_error_kind(&outer), Some(io::ErrorKind::Other));
    }
}
