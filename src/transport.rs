//! Transport abstraction for retrieving result pages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::debug;

use crate::config::SearchConfig;
use crate::proxy::ProxyConfig;
use crate::{Result, SearchError};

/// Default user agent sent to sources.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// A GET request for one result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Absolute URL.
    pub url: String,
    /// Upper bound for the whole exchange.
    pub timeout: Duration,
}

impl TransportRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

/// Raw response of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`SearchError::Status`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SearchError::Status(self.status))
        }
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes requests on behalf of the pipeline.
///
/// Implementations decide how traffic leaves the process (direct, HTTP
/// proxy, SOCKS/Tor). Non-2xx statuses are returned, not raised; the
/// pipeline decides what a status means.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request.
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse>;
}

/// [`Transport`] backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the default user agent and no proxy.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a transport with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Creates a transport from the user agent and proxy of `config`.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(ProxyConfig::parse(proxy)?);
        }
        builder.build()
    }

    /// Starts a builder.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransportBuilder {
    user_agent: Option<String>,
    proxy: Option<ProxyConfig>,
}

impl HttpTransportBuilder {
    /// Sets the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Routes all requests through a proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Builds the transport.
    pub fn build(self) -> Result<HttpTransport> {
        let agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let mut builder = Client::builder()
            .user_agent(agent)
            .gzip(true)
            .brotli(true);

        if let Some(proxy) = &self.proxy {
            debug!("Routing transport through proxy {}", proxy);
            let proxy = Proxy::all(proxy.url())
                .map_err(|e| SearchError::Config(format!("Invalid proxy: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let response = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
