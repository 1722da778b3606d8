//! HTTP transport implementation
//!
//! This module handles the single GET request made per run:
//! - Building the HTTP client with browser-like headers and optional proxy
//! - Retrying 500/502/503/504 responses with exponential backoff
//! - Classifying network failures

use crate::config::SourceConfig;
use crate::fetch::{FetchError, RetryPolicy, Transport};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{Client, Proxy};
use std::error::Error as StdError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Builds an HTTP client from the source configuration
///
/// Certificate validation is switched off only when
/// `config.accept_invalid_certs` is set. The GDT portal presents a legacy
/// chain that rustls refuses, so the default configuration sets it for that
/// one source; other endpoints should leave it off.
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Invalid proxy URL or header, or TLS backend failure
///
/// # Example
///
/// ```no_run
/// use hddt_sync::config::SourceConfig;
/// use hddt_sync::fetch::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .danger_accept_invalid_certs(config.accept_invalid_certs);

    builder = match &config.proxy {
        Some(proxy) => builder.proxy(Proxy::all(proxy.as_str())?),
        // Ignore HTTP(S)_PROXY from the environment unless configured
        None => builder.no_proxy(),
    };

    builder.build()
}

/// Production [`Transport`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    retry: RetryPolicy,
    via_proxy: bool,
}

impl HttpTransport {
    /// Creates a transport from an explicit source configuration
    pub fn new(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        if config.proxy.is_some() {
            tracing::info!("Using configured proxy for upstream requests");
        } else {
            tracing::info!("No proxy configured, connecting directly");
        }

        if config.accept_invalid_certs {
            tracing::debug!("Certificate validation disabled for this source");
        }

        Ok(Self {
            client: build_http_client(config)?,
            retry: RetryPolicy::new(config.max_retries, config.backoff_base()),
            via_proxy: config.proxy.is_some(),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Maps a reqwest failure onto the transport error taxonomy
    ///
    /// TLS markers are looked for in the underlying causes only. The
    /// top-level message names the request URL, whose path or host may
    /// contain `ssl` or `tls` on its own.
    fn classify(&self, error: reqwest::Error) -> FetchError {
        let message = error_chain(&error);
        let error = error.without_url();
        let causes = error
            .source()
            .map(error_chain)
            .unwrap_or_default()
            .to_lowercase();

        if error.is_timeout() {
            FetchError::Connection {
                message,
                timed_out: true,
            }
        } else if ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| causes.contains(needle))
        {
            FetchError::Tls(message)
        } else if self.via_proxy
            && (error.is_connect() || causes.contains("proxy") || causes.contains("tunnel"))
        {
            FetchError::ProxyUnreachable(message)
        } else {
            FetchError::Connection {
                message,
                timed_out: false,
            }
        }
    }
}

impl Transport for HttpTransport {
    /// Fetches `url` as text
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return body |
    /// | HTTP 500/502/503/504 | Retry up to `max_retries` times with backoff |
    /// | Other HTTP status | Immediate → `Status` |
    /// | Proxy connect failure | Immediate → `ProxyUnreachable` |
    /// | TLS/SSL error | Immediate → `Tls` |
    /// | Timeout, DNS, refused | Immediate → `Connection` |
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut retries_done = 0;

        loop {
            tracing::debug!("GET {} (attempt {})", url, retries_done + 1);

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.classify(e))?;
            let status = response.status();

            if status.is_success() {
                return response.text().await.map_err(|e| self.classify(e));
            }

            if self.retry.should_retry(status, retries_done) {
                let delay = self.retry.backoff(retries_done);
                tracing::warn!(
                    "Upstream returned {}, retrying in {:?} ({}/{})",
                    status,
                    delay,
                    retries_done + 1,
                    self.retry.max_retries
                );
                tokio::time::sleep(delay).await;
                retries_done += 1;
                continue;
            }

            return Err(FetchError::Status {
                status: status.as_u16(),
                attempts: retries_done + 1,
            });
        }
    }
}

/// Joins an error and all of its sources into one message
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str) -> SourceConfig {
        SourceConfig {
            url: url.to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            max_retries: 3,
            backoff_base_ms: 1,
            accept_invalid_certs: false,
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&SourceConfig::default()).is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let mut config = SourceConfig::default();
        config.proxy = Some("http://127.0.0.1:3128".to_string());
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_transport_uses_configured_retry_policy() {
        let transport = HttpTransport::new(&test_config("https://example.com/")).unwrap();
        assert_eq!(
            transport.retry_policy(),
            RetryPolicy::new(3, Duration::from_millis(1))
        );
    }

    #[tokio::test]
    async fn test_fetch_success_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list"))
            .and(wiremock::matchers::header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/list", server.uri());
        let transport = HttpTransport::new(&test_config(&url)).unwrap();
        let body = transport.fetch(&url).await.unwrap();

        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_retries_transient_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .mount(&server)
            .await;

        let url = format!("{}/list", server.uri());
        let transport = HttpTransport::new(&test_config(&url)).unwrap();

        assert_eq!(transport.fetch(&url).await.unwrap(), "recovered");
    }

    #[tokio::test]
    async fn test_fetch_does_not_retry_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/missing", server.uri());
        let transport = HttpTransport::new(&test_config(&url)).unwrap();
        let err = transport.fetch(&url).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status {
                status: 404,
                attempts: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(4)
            .mount(&server)
            .await;

        let url = format!("{}/list", server.uri());
        let transport = HttpTransport::new(&test_config(&url)).unwrap();
        let err = transport.fetch(&url).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status {
                status: 502,
                attempts: 4
            }
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_connection_failure() {
        let url = "http://127.0.0.1:1/list";
        let transport = HttpTransport::new(&test_config(url)).unwrap();
        let err = transport.fetch(url).await.unwrap_err();

        assert!(matches!(err, FetchError::Connection { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_tls_words_in_url_do_not_make_a_tls_failure() {
        let url = "http://127.0.0.1:1/ssl-certificate-tls-handshake/list";
        let transport = HttpTransport::new(&test_config(url)).unwrap();
        let err = transport.fetch(url).await.unwrap_err();

        assert!(
            matches!(err, FetchError::Connection { timed_out: false, .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_classified() {
        let url = "http://example.com/list";
        let mut config = test_config(url);
        config.proxy = Some("http://127.0.0.1:1".to_string());

        let transport = HttpTransport::new(&config).unwrap();
        let err = transport.fetch(url).await.unwrap_err();

        assert!(matches!(err, FetchError::ProxyUnreachable(_)), "got {err:?}");
    }
}
