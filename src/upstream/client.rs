//! HTTP client for the address registry.

use std::borrow::Cow;
use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use url::Url;

use crate::config::UpstreamConfig;

/// Content types the gateway can handle from the registry.
pub const ACCEPT_VALUE: &str = "application/json, text/xml";

/// Bodies are relayed or transcoded as plain bytes, never compressed.
pub const ACCEPT_ENCODING_VALUE: &str = "identity";

/// Errors raised while talking to the registry.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        match self {
            UpstreamError::Transport(e) | UpstreamError::Body(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// One outbound request: always a GET with the fixed header set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequestSpec {
    /// Path and query relative to the upstream origin.
    pub path: String,
}

impl UpstreamRequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn method(&self) -> Method {
        Method::GET
    }
}

/// A fully received upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.headers.get(header::CONTENT_TYPE)
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Client bound to a single upstream origin.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| UpstreamError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self { http, base_url })
    }

    /// Absolute URL for a request spec.
    pub fn url_for(&self, spec: &UpstreamRequestSpec) -> Result<Url, UpstreamError> {
        self.base_url
            .join(&spec.path)
            .map_err(|source| UpstreamError::InvalidUrl {
                url: spec.path.clone(),
                source,
            })
    }

    /// Perform the request and read the whole body.
    pub async fn fetch(&self, spec: &UpstreamRequestSpec) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(spec)?;

        let response = self
            .http
            .request(spec.method(), url)
            .header(header::ACCEPT, ACCEPT_VALUE)
            .header(header::ACCEPT_ENCODING, ACCEPT_ENCODING_VALUE)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(UpstreamError::Body)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
