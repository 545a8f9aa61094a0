// ABOUTME: Structured error types for upstream data provider operations
// ABOUTME: Distinguishes transient, fatal, and circuit-open failures with retry hints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use thiserror::Error;

/// Errors raised while talking to an upstream data provider
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Requests are blocked because the provider's circuit is open
    #[error("Circuit breaker is open for {provider}, requests blocked (retry after {retry_after_secs}s)")]
    CircuitBreakerOpen {
        /// Provider name
        provider: String,
        /// Seconds until a call will be let through again
        retry_after_secs: u64,
    },

    /// Provider kept answering 429 until the retry budget ran out
    #[error("{provider} rate limit exceeded after {attempts} attempt(s)")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Last retry hint the provider sent, in whole seconds
        retry_after_secs: Option<u64>,
        /// Attempts made for the logical request
        attempts: u32,
    },

    /// Provider answered with a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status code returned
        status_code: u16,
        /// Error details
        message: String,
        /// Whether the status belongs to the transient class
        retryable: bool,
    },

    /// Connection failure or timeout before a response was received
    #[error("{provider} network error: {message}")]
    NetworkError {
        /// Provider name
        provider: String,
        /// Underlying transport error
        message: String,
        /// The attempt exceeded its timeout
        timed_out: bool,
    },

    /// Response body could not be decoded
    #[error("{provider} response could not be parsed: {message}")]
    ParseError {
        /// Provider name
        provider: String,
        /// Decoder error
        message: String,
    },

    /// Client or provider misconfiguration
    #[error("{provider} configuration error: {message}")]
    ConfigurationError {
        /// Provider name
        provider: String,
        /// What is wrong
        message: String,
    },
}

impl ProviderError {
    /// Whether the failure belongs to the transient class (429, 5xx, network)
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } | Self::NetworkError { .. } => true,
            Self::ApiError { retryable, .. } => *retryable,
            Self::CircuitBreakerOpen { .. }
            | Self::ParseError { .. }
            | Self::ConfigurationError { .. } => false,
        }
    }

    /// Seconds the caller should wait before trying again, when known
    #[must_use]
    pub const fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::CircuitBreakerOpen {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            Self::RateLimitExceeded {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// Provider the error originated from
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::CircuitBreakerOpen { provider, .. }
            | Self::RateLimitExceeded { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::NetworkError { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::ConfigurationError { provider, .. } => provider,
        }
    }

    /// HTTP status that produced the error, if any
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            Self::RateLimitExceeded { .. } => Some(429),
            _ => None,
        }
    }
}

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
