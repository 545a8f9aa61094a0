// ABOUTME: HTTP transport seam for upstream provider calls
// ABOUTME: Reqwest-backed transport owning a connection pool with configured timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::errors::provider::{ProviderError, ProviderResult};

/// Per-request headers, query parameters and timeout override
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Query string parameters, in order
    pub query: Vec<(String, String)>,
    /// Overrides the client's default per-attempt timeout
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Override the per-attempt timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status, retry hint and body of an upstream response
///
/// The body is kept opaque; only the status code and the `Retry-After`
/// header drive the retry policy.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    status: u16,
    retry_after: Option<String>,
    body: Bytes,
}

impl UpstreamResponse {
    /// Build a response from a status code and body
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Attach a `Retry-After` value
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: impl Into<String>) -> Self {
        self.retry_after = Some(retry_after.into());
        self
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Raw `Retry-After` header value
    #[must_use]
    pub fn retry_after(&self) -> Option<&str> {
        self.retry_after.as_deref()
    }

    /// Raw body bytes
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, lossily
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ParseError` if the body is not valid JSON for `T`
    pub fn json<T: DeserializeOwned>(&self, provider: &str) -> ProviderResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| ProviderError::ParseError {
            provider: provider.to_owned(),
            message: e.to_string(),
        })
    }
}

/// Failure before any HTTP response was received
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The attempt exceeded its timeout
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),
    /// Any other request or body read failure
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether the failure was a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Convert into the provider error surfaced once retries are exhausted
    #[must_use]
    pub fn into_provider_error(self, provider: &str) -> ProviderError {
        ProviderError::NetworkError {
            provider: provider.to_owned(),
            timed_out: self.is_timeout(),
            message: self.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Network seam used by the resilient client
///
/// One call is one attempt; retries, sleeps and breaker bookkeeping live in
/// the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a single `GET`
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no response could be obtained within `timeout`
    async fn get(
        &self,
        url: &str,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<UpstreamResponse, TransportError>;
}

/// Reqwest transport with its own connection pool
///
/// Each resilient client owns one of these; pools are never shared between
/// client instances.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given connection timeout
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the TLS backend cannot be initialized
    pub fn new(provider: &str, connect_timeout: Duration) -> ProviderResult<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ProviderError::ConfigurationError {
                provider: provider.to_owned(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<UpstreamResponse, TransportError> {
        let mut request = self.client.get(url).timeout(timeout).query(&options.query);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            retry_after,
            body,
        })
    }
}
