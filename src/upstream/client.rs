//! HTTP client for the upstream traffic API
//!
//! This module issues the actual GET requests against
//! `verkehr.autobahn.de` and maps transport problems onto the typed
//! failure taxonomy. Connection pooling and TLS come from the shared
//! `reqwest` client.
//!
//! # Resilience
//!
//! Every call is timeboxed individually. Transient failures (timeout,
//! connection refused/DNS, 5xx) get exactly one automatic retry after a
//! short fixed backoff. 4xx statuses are treated as permanent and never
//! retried: the caller validates highway identifiers before building a
//! resource path, so a client-side rejection means the upstream contract
//! changed, not that the request was racy.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{Error, Result, UpstreamError};

/// Base URL of the public Autobahn traffic API
pub const DEFAULT_BASE_URL: &str = "https://verkehr.autobahn.de/o/autobahn";

/// Configuration for the upstream client
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the traffic API (default: the public endpoint)
    pub base_url: String,
    /// Per-request timeout in milliseconds (default: 10000)
    pub timeout_ms: u64,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Backoff before the single automatic retry in milliseconds (default: 250)
    pub retry_backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            retry_backoff_ms: 250,
        }
    }
}

impl UpstreamConfig {
    /// Create a new config builder
    pub fn builder() -> UpstreamConfigBuilder {
        UpstreamConfigBuilder::default()
    }
}

/// Builder for UpstreamConfig
#[derive(Default)]
pub struct UpstreamConfigBuilder {
    config: UpstreamConfig,
}

impl UpstreamConfigBuilder {
    /// Set the base URL
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the retry backoff
    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    /// Build the config
    pub fn build(self) -> UpstreamConfig {
        self.config
    }
}

/// Client for the upstream traffic API.
///
/// Cheap to share: the underlying `reqwest` client pools connections
/// internally, so one instance serves all categories concurrently.
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
    base: Url,
}

impl UpstreamClient {
    /// Create a new upstream client.
    ///
    /// Validates the base URL and builds the pooled HTTP client; both
    /// failures are configuration errors, not upstream ones.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            Error::Config(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            base,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Absolute URL for one resource path below the base.
    ///
    /// The empty path addresses the enumeration endpoint, which lives at
    /// the base itself with a trailing slash.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Fetch one resource and decode it as JSON.
    ///
    /// The resource path must already be built from a validated highway
    /// identifier; this layer does not second-guess it.
    #[instrument(skip(self))]
    pub async fn fetch_json(&self, path: &str) -> std::result::Result<Value, UpstreamError> {
        let url = self.endpoint(path);

        match self.fetch_once(&url).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_transient() => {
                warn!(
                    url = %url,
                    backoff_ms = self.config.retry_backoff_ms,
                    error = %e,
                    "Transient upstream failure, retrying once"
                );
                tokio::time::sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                self.fetch_once(&url).await
            }
            Err(e) => Err(e),
        }
    }

    /// Single GET attempt with status and body classification.
    async fn fetch_once(&self, url: &str) -> std::result::Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(UpstreamError::Unavailable(format!(
                "upstream returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(UpstreamError::BadResponse(format!(
                "unexpected status {}",
                status
            )));
        }

        debug!(url = %url, status = %status, "Upstream responded");

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(self.config.timeout_ms)
            } else {
                UpstreamError::BadResponse(format!("invalid JSON body: {}", e))
            }
        })
    }

    /// Map a reqwest transport error onto the failure taxonomy.
    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.config.timeout_ms)
        } else if err.is_connect() {
            UpstreamError::Unavailable(format!("connection failed: {}", err))
        } else {
            UpstreamError::Unavailable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> UpstreamConfig {
        UpstreamConfig::builder()
            .base_url(base_url)
            .timeout_ms(500)
            .connect_timeout_ms(200)
            .retry_backoff_ms(10)
            .build()
    }

    #[test]
    fn test_config_default() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert_eq!(config.retry_backoff_ms, 250);
    }

    #[test]
    fn test_config_builder() {
        let config = UpstreamConfig::builder()
            .base_url("http://localhost:9999/api")
            .timeout_ms(2_000)
            .connect_timeout_ms(1_000)
            .retry_backoff_ms(50)
            .build();

        assert_eq!(config.base_url, "http://localhost:9999/api");
        assert_eq!(config.timeout_ms, 2_000);
        assert_eq!(config.connect_timeout_ms, 1_000);
        assert_eq!(config.retry_backoff_ms, 50);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = UpstreamConfig::builder().base_url("not a url").build();
        let result = UpstreamClient::new(config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_formatting() {
        let client =
            UpstreamClient::new(test_config("http://localhost:8080/o/autobahn/".to_string()))
                .unwrap();
        assert_eq!(
            client.endpoint("A1/services/warning"),
            "http://localhost:8080/o/autobahn/A1/services/warning"
        );
        // Enumeration endpoint keeps the trailing slash
        assert_eq!(client.endpoint(""), "http://localhost:8080/o/autobahn/");
    }

    #[tokio::test]
    async fn test_fetch_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"warning": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(test_config(server.uri())).unwrap();
        let value = client.fetch_json("A1/services/warning").await.unwrap();
        assert_eq!(value, json!({"warning": []}));
    }

    #[tokio::test]
    async fn test_fetch_json_retries_once_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"warning": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(test_config(server.uri())).unwrap();
        let value = client.fetch_json("A1/services/warning").await.unwrap();
        assert_eq!(value, json!({"warning": []}));
    }

    #[tokio::test]
    async fn test_fetch_json_gives_up_after_one_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A7/services/closure"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(test_config(server.uri())).unwrap();
        let result = client.fetch_json("A7/services/closure").await;
        assert!(matches!(result, Err(UpstreamError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_json_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(test_config(server.uri())).unwrap();
        let result = client.fetch_json("A1/services/warning").await;
        assert!(matches!(result, Err(UpstreamError::BadResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_json_classifies_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"warning": []}))
                    .set_delay(Duration::from_millis(2_000)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(server.uri());
        config.timeout_ms = 100;
        let client = UpstreamClient::new(config).unwrap();
        let result = client.fetch_json("A1/services/warning").await;
        assert!(matches!(result, Err(UpstreamError::Timeout(100))));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A1/services/warning"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(test_config(server.uri())).unwrap();
        let result = client.fetch_json("A1/services/warning").await;
        assert!(matches!(result, Err(UpstreamError::BadResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_json_classifies_connection_failure() {
        // Nothing listens on this port; connection is refused immediately.
        let client =
            UpstreamClient::new(test_config("http://127.0.0.1:9".to_string())).unwrap();
        let result = client.fetch_json("A1/services/warning").await;
        assert!(matches!(result, Err(UpstreamError::Unavailable(_))));
    }
}
