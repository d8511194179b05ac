//! Transport to the backend service that owns all persisted data.
//!
//! Every proxied route funnels through [`UpstreamTransport::send`]; the
//! trait exists so tests can substitute a scripted transport and assert on
//! the calls the gateway does (or does not) make.

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::constants::{USER_AGENT, limits};

#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,

    /// Path under the upstream origin, always starting with `/`.
    pub path: String,

    /// Raw query string forwarded verbatim, already URL-encoded.
    pub query: Option<String>,

    /// `Authorization` header value forwarded untouched when present.
    pub authorization: Option<String>,

    pub body: Option<Value>,

    pub timeout: Duration,
}

impl UpstreamRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            authorization: None,
            body: None,
            timeout: Duration::from_millis(crate::constants::timeouts::UPSTREAM_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,

    /// Upstream body parsed as JSON; `Null` for an empty body.
    pub body: Value,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The per-request deadline fired while the call was in flight.
    #[error("upstream call timed out")]
    Timeout,

    #[error("upstream transport failure: {0}")]
    Transport(String),

    #[error("upstream returned an unreadable body: {0}")]
    InvalidBody(String),
}

#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamReply, UpstreamError>;
}

/// Production transport over a shared connection-pooled HTTP client.
pub struct HttpUpstream {
    client: Client,

    /// Base origin without a trailing slash.
    base: String,
}

impl HttpUpstream {
    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(limits::POOL_MAX_IDLE_PER_HOST)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build upstream HTTP client: {e}"))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, request: &UpstreamRequest) -> String {
        match request.query.as_deref() {
            Some(query) if !query.is_empty() => {
                format!("{}{}?{}", self.base, request.path, query)
            }
            _ => format!("{}{}", self.base, request.path),
        }
    }
}

#[async_trait]
impl UpstreamTransport for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamReply, UpstreamError> {
        let url = self.endpoint(&request);
        debug!(method = %request.method, url = %url, "Forwarding to upstream");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(request.timeout);

        if let Some(auth) = &request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, auth);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let labels = [("outcome", if e.is_timeout() { "timeout" } else { "transport" })];
            metrics::counter!("upstream_requests_total", &labels).increment(1);

            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Transport(e.to_string())
            }
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Transport(e.to_string())
            }
        })?;

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidBody(e.to_string()))?
        };

        let labels = [("outcome", "ok")];
        metrics::counter!("upstream_requests_total", &labels).increment(1);

        Ok(UpstreamReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_query() {
        let upstream = HttpUpstream::with_client(Client::new(), "http://localhost:9000/");

        let mut request = UpstreamRequest::get("/posts");
        assert_eq!(upstream.endpoint(&request), "http://localhost:9000/posts");

        request.query = Some("page=2&category=press".to_string());
        assert_eq!(
            upstream.endpoint(&request),
            "http://localhost:9000/posts?page=2&category=press"
        );
    }

    #[test]
    fn empty_query_is_dropped() {
        let upstream = HttpUpstream::with_client(Client::new(), "http://localhost:9000");

        let mut request = UpstreamRequest::get("/banners");
        request.query = Some(String::new());
        assert_eq!(upstream.endpoint(&request), "http://localhost:9000/banners");
    }
}
