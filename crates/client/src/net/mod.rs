//! HTTP transport implementation.
//!
//! Wraps a reqwest client configured the way the worker needs it:
//! rustls TLS, compression, a deploy-supplied User-Agent and timeout, and
//! no cookie store — outgoing fetches (including the cross-origin install
//! pre-cache) never carry credentials.
//!
//! Transport errors and HTTP errors are distinct: only connection-level
//! failures (refused, DNS, timeout) surface as `Err`; any HTTP status comes
//! back as a response for the strategies to inspect.

pub mod url;

use std::time::Duration;

use awning_core::{CachedResponse, Error, Method, Request, Transport};

pub use url::{UrlError, canonicalize};

/// Configuration for the network client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string (default: "awning/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "awning/0.1".to_string(),
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

/// HTTP transport backed by reqwest.
pub struct NetworkClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl NetworkClient {
    /// Create a new network client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[async_trait::async_trait]
impl Transport for NetworkClient {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse, Error> {
        let response = self
            .http
            .request(reqwest_method(request.method), request.url.clone())
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response body: {e}")))?;

        tracing::debug!("fetched {} -> {} ({} bytes)", request.url, status, bytes.len());

        Ok(CachedResponse { status, headers, body: bytes.to_vec() })
    }
}
