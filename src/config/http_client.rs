// ABOUTME: Outbound HTTP client configuration for upstream data providers
// ABOUTME: Timeouts, retry budget, backoff and circuit breaker settings from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::constants::http_client::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CAP_MS, DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
    DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_MS,
};
use crate::errors::{AppError, AppResult};
use crate::providers::ResilientClientConfig;

/// HTTP client configuration, expressed in (fractional) seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Per-attempt timeout in seconds
    pub timeout_secs: f64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: f64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Exponential backoff base in seconds
    pub backoff_base_secs: f64,
    /// Ceiling for one backoff delay in seconds
    pub backoff_cap_secs: f64,
    /// Consecutive failed calls before the circuit opens
    pub circuit_breaker_threshold: u32,
    /// Seconds after the last failure before an open circuit lets a call through
    pub circuit_reset_timeout_secs: f64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: millis_to_secs(DEFAULT_TIMEOUT_MS),
            connect_timeout_secs: millis_to_secs(DEFAULT_CONNECT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_secs: millis_to_secs(DEFAULT_BACKOFF_BASE_MS),
            backoff_cap_secs: millis_to_secs(DEFAULT_BACKOFF_CAP_MS),
            circuit_breaker_threshold: DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            circuit_reset_timeout_secs: DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS as f64,
        }
    }
}

impl HttpClientConfig {
    /// Load HTTP client configuration from environment
    ///
    /// Unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: env_secs("HTTP_CLIENT_TIMEOUT_SECS", defaults.timeout_secs),
            connect_timeout_secs: env_secs(
                "HTTP_CLIENT_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            max_retries: env::var("HTTP_CLIENT_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            backoff_base_secs: env_secs("HTTP_CLIENT_BACKOFF_BASE_SECS", defaults.backoff_base_secs),
            backoff_cap_secs: env_secs("HTTP_CLIENT_BACKOFF_CAP_SECS", defaults.backoff_cap_secs),
            circuit_breaker_threshold: env::var("HTTP_CLIENT_CIRCUIT_BREAKER_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.circuit_breaker_threshold),
            circuit_reset_timeout_secs: env_secs(
                "HTTP_CLIENT_CIRCUIT_RESET_TIMEOUT_SECS",
                defaults.circuit_reset_timeout_secs,
            ),
        }
    }

    /// Convert into the resilient client's settings, validating the combination
    ///
    /// # Errors
    ///
    /// Returns a configuration error for negative or non-finite durations, a zero
    /// timeout or breaker threshold, or a backoff cap below the base delay
    pub fn to_client_config(&self) -> AppResult<ResilientClientConfig> {
        let config = ResilientClientConfig {
            default_timeout: secs_to_duration("timeout_secs", self.timeout_secs)?,
            connect_timeout: secs_to_duration("connect_timeout_secs", self.connect_timeout_secs)?,
            max_retries: self.max_retries,
            backoff_base: secs_to_duration("backoff_base_secs", self.backoff_base_secs)?,
            backoff_cap: secs_to_duration("backoff_cap_secs", self.backoff_cap_secs)?,
            circuit_breaker_threshold: self.circuit_breaker_threshold,
            circuit_reset_timeout: secs_to_duration(
                "circuit_reset_timeout_secs",
                self.circuit_reset_timeout_secs,
            )?,
        };

        config
            .validate("http_client")
            .map_err(|e| AppError::config(format!("Invalid HTTP client configuration: {e}")))?;
        Ok(config)
    }
}

fn env_secs(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn millis_to_secs(millis: u64) -> f64 {
    millis as f64 / 1000.0
}

fn secs_to_duration(field: &str, secs: f64) -> AppResult<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| AppError::config(format!("{field} must be a non-negative number, got {secs}")))
}
