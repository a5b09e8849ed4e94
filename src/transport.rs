//! HTTP transport.
//!
//! The pipeline talks to the network only through [`Transport`], so tests
//! can drive it with canned responses. [`HttpTransport`] is the real one:
//! - HTTP/2 with fallback to HTTP/1.1
//! - TLS 1.3 via rustls
//! - Brotli, Gzip, Deflate (auto-negotiated)
//! - Cookie store, so a portal session survives the probe → fetch hop
//! - Redirects followed hop by hop (limit 10), only to hosts the caller's
//!   [`HostScope`] permits; final URL reported on the response

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Transport-level failure (no HTTP status was obtained).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Outcome of a header-only probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// URL the request ended at after following redirects.
    pub final_url: Option<String>,
    /// URL the last response pointed to (`Location`), when redirects were
    /// not followed to the end.
    pub response_url: Option<String>,
}

/// A fully buffered response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Hosts a request may reach, including every redirect hop.
pub trait HostScope: Send + Sync {
    fn permits(&self, url: &Url) -> bool;
}

/// Scope that permits every http(s) URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyHost;

impl HostScope for AnyHost {
    fn permits(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }
}

/// Network access used by the preview pipeline.
///
/// A redirect to a URL outside `scope` is not followed; the redirect
/// response itself is returned instead.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a HEAD request. No body is transferred.
    async fn head(&self, url: &Url, scope: &dyn HostScope)
        -> Result<ProbeResponse, TransportError>;

    /// Issue a GET request with the given `Accept` header and buffer the body.
    async fn get(
        &self,
        url: &Url,
        accept: &str,
        scope: &dyn HostScope,
    ) -> Result<BodyResponse, TransportError>;
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_redirects: 10,
            user_agent: format!("coursepeek/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// [`Transport`] backed by reqwest.
pub struct HttpTransport {
    client: Client,
    max_redirects: usize,
}

impl HttpTransport {
    /// Create a transport with default settings.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Create a transport with explicit settings.
    pub fn with_config(config: &HttpConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            // ═══════════════════════════════════════════════════════════════
            // CONNECTION
            // ═══════════════════════════════════════════════════════════════
            // Let the server negotiate HTTP/2 vs HTTP/1.1
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // ═══════════════════════════════════════════════════════════════
            // COMPRESSION (auto-negotiated via Accept-Encoding)
            // ═══════════════════════════════════════════════════════════════
            .brotli(true)
            .gzip(true)
            .deflate(true)
            // ═══════════════════════════════════════════════════════════════
            // TIMEOUTS (the only ones; the pipeline adds none)
            // ═══════════════════════════════════════════════════════════════
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            // ═══════════════════════════════════════════════════════════════
            // REDIRECTS + COOKIES (hops are followed in `send_within`)
            // ═══════════════════════════════════════════════════════════════
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    /// Fetch a page and return its body as text (used for page snapshots).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &Url) -> anyhow::Result<String> {
        let response = self.send_within(Method::GET, url, None, &AnyHost).await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("page request failed with status {status}");
        }
        Ok(response.text().await?)
    }

    /// Send `method` to `url`, following redirects while each next hop is
    /// inside `scope`. A hop outside it ends the chain with the redirect
    /// response.
    async fn send_within(
        &self,
        method: Method,
        url: &Url,
        accept: Option<&str>,
        scope: &dyn HostScope,
    ) -> Result<Response, TransportError> {
        if !scope.permits(url) {
            return Err(TransportError::Request(format!(
                "{url} is outside the permitted hosts"
            )));
        }

        let mut current = url.clone();
        let mut hops = 0;
        loop {
            let mut request = self.client.request(method.clone(), current.clone());
            if let Some(accept) = accept {
                request = request.header(ACCEPT, accept);
            }
            let response = request.send().await?;

            if !response.status().is_redirection() {
                return Ok(response);
            }
            let Some(next) = location(&response) else {
                return Ok(response);
            };
            if !scope.permits(&next) {
                warn!(from = %current, to = %next, "Redirect leaves permitted hosts, not following");
                return Ok(response);
            }
            if hops == self.max_redirects {
                return Err(TransportError::Request(format!(
                    "too many redirects (limit {})",
                    self.max_redirects
                )));
            }

            debug!(to = %next, "Following redirect");
            hops += 1;
            current = next;
        }
    }
}

/// Absolute target of a redirect response's `Location` header.
fn location(response: &Response) -> Option<Url> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|loc| response.url().join(loc).ok())
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, scope), fields(url = %url))]
    async fn head(
        &self,
        url: &Url,
        scope: &dyn HostScope,
    ) -> Result<ProbeResponse, TransportError> {
        debug!("Probing");
        let response = self.send_within(Method::HEAD, url, None, scope).await?;

        let final_url = Some(response.url().to_string());
        let response_url = location(&response).map(|u| u.to_string());

        info!(
            status = %response.status(),
            final_url = ?final_url,
            "Probe answered"
        );

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            final_url,
            response_url,
        })
    }

    #[instrument(skip(self, scope), fields(url = %url))]
    async fn get(
        &self,
        url: &Url,
        accept: &str,
        scope: &dyn HostScope,
    ) -> Result<BodyResponse, TransportError> {
        debug!(accept, "Fetching");
        let response = self
            .send_within(Method::GET, url, Some(accept), scope)
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?;

        info!(
            status,
            content_type = ?content_type,
            bytes = body.len(),
            "Response received"
        );

        Ok(BodyResponse {
            status,
            content_type,
            body,
        })
    }
}
