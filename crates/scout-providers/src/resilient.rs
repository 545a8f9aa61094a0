// ABOUTME: Resilient HTTP client with bounded retries, backoff with jitter, and a circuit breaker
// ABOUTME: Retries 429/5xx/network failures, surfaces fatal 4xx at once, fails fast while open
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::backoff::{parse_retry_after, BackoffPolicy};
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::constants::http_client::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CAP_MS, DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
    DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_MS, RETRYABLE_SERVER_STATUSES,
};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::http_client::{HttpTransport, ReqwestTransport, RequestOptions, UpstreamResponse};
use crate::telemetry::{ClientTelemetry, TelemetrySnapshot};

/// Longest slice of an error body copied into error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Retry, timeout and breaker settings for one upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResilientClientConfig {
    /// Per-attempt timeout when the request does not override it
    pub default_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Retry attempts after the first one
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub backoff_base: Duration,
    /// Ceiling for a single backoff delay (before jitter)
    pub backoff_cap: Duration,
    /// Consecutive failures before the circuit opens
    pub circuit_breaker_threshold: u32,
    /// Time since the last failure before an open circuit lets a call through
    pub circuit_reset_timeout: Duration,
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            backoff_cap: Duration::from_millis(DEFAULT_BACKOFF_CAP_MS),
            circuit_breaker_threshold: DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            circuit_reset_timeout: Duration::from_secs(DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS),
        }
    }
}

impl ResilientClientConfig {
    /// Check that the settings describe a usable client
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` for a zero timeout, a zero
    /// breaker threshold, or a backoff cap below the base delay
    pub fn validate(&self, provider: &str) -> ProviderResult<()> {
        let problem = if self.default_timeout.is_zero() {
            Some("default timeout must be greater than zero")
        } else if self.circuit_breaker_threshold == 0 {
            Some("circuit breaker threshold must be at least 1")
        } else if self.backoff_cap < self.backoff_base {
            Some("backoff cap must not be smaller than the backoff base")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(ProviderError::ConfigurationError {
                provider: provider.to_owned(),
                message: message.to_owned(),
            })
        })
    }

    /// Backoff policy derived from these settings
    #[must_use]
    pub const fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.backoff_base, self.backoff_cap)
    }

    /// Circuit breaker settings derived from these settings
    #[must_use]
    pub const fn circuit_breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig::new(self.circuit_breaker_threshold, self.circuit_reset_timeout)
    }
}

/// How a single attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttemptOutcome {
    /// 2xx response
    Success,
    /// 429, 5xx in the retry set, or a network failure
    RetryableFailure,
    /// Any other status; never retried
    FatalFailure,
}

/// Ephemeral record of one attempt, emitted as a structured log event
#[derive(Debug, Clone)]
pub(crate) struct AttemptRecord<'a> {
    /// Zero-based attempt index
    pub attempt: u32,
    /// Target URL
    pub url: &'a str,
    /// Sleep scheduled before the next attempt, if any
    pub delay: Option<Duration>,
    /// Outcome of the attempt
    pub outcome: AttemptOutcome,
}

impl AttemptRecord<'_> {
    fn emit(&self, provider: &str) {
        let delay_ms = self.delay.map(|d| d.as_millis());
        match self.outcome {
            AttemptOutcome::Success => debug!(
                provider,
                url = self.url,
                attempt = self.attempt + 1,
                "Upstream request succeeded"
            ),
            AttemptOutcome::RetryableFailure => info!(
                provider,
                url = self.url,
                attempt = self.attempt + 1,
                delay_ms,
                "Retryable upstream failure"
            ),
            AttemptOutcome::FatalFailure => warn!(
                provider,
                url = self.url,
                attempt = self.attempt + 1,
                "Fatal upstream failure, not retrying"
            ),
        }
    }
}

/// Result of classifying a failed attempt
enum Failure {
    Retryable {
        error: ProviderError,
        rate_limit_hint: Option<Option<String>>,
    },
    Fatal(ProviderError),
}

/// HTTP client that shields callers from transient upstream failures
///
/// Every logical `GET` gets up to `max_retries + 1` strictly sequential
/// attempts. 429 responses sleep for the provider's `Retry-After` hint (capped),
/// 5xx and network failures sleep for an exponential delay with jitter, and
/// other 4xx responses fail immediately. A logical call that ultimately fails
/// counts once towards the circuit breaker; once the breaker opens every call
/// fails with [`ProviderError::CircuitBreakerOpen`] without touching the network.
///
/// Dropping the future returned by [`get`](Self::get) cancels the call at the
/// current await point. A cancelled call records neither a success nor a
/// failure.
#[derive(Debug)]
pub struct ResilientHttpClient<T = ReqwestTransport> {
    provider: String,
    config: ResilientClientConfig,
    backoff: BackoffPolicy,
    breaker: CircuitBreaker,
    telemetry: ClientTelemetry,
    transport: T,
}

impl ResilientHttpClient<ReqwestTransport> {
    /// Create a client backed by its own reqwest connection pool
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the configuration is invalid
    /// or the HTTP client cannot be built
    pub fn new(provider: &str, config: ResilientClientConfig) -> ProviderResult<Self> {
        let transport = ReqwestTransport::new(provider, config.connect_timeout)?;
        Self::with_transport(provider, config, transport)
    }
}

impl<T: HttpTransport> ResilientHttpClient<T> {
    /// Create a client over an arbitrary transport
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the configuration is invalid
    pub fn with_transport(
        provider: &str,
        config: ResilientClientConfig,
        transport: T,
    ) -> ProviderResult<Self> {
        config.validate(provider)?;
        Ok(Self {
            provider: provider.to_owned(),
            backoff: config.backoff_policy(),
            breaker: CircuitBreaker::with_config(provider, config.circuit_breaker_config()),
            telemetry: ClientTelemetry::default(),
            config,
            transport,
        })
    }

    /// Provider name used in logs and errors
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &ResilientClientConfig {
        &self.config
    }

    /// Circuit breaker guarding this upstream
    #[must_use]
    pub const fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Underlying transport
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of request counters and breaker state
    #[must_use]
    pub fn telemetry(&self) -> TelemetrySnapshot {
        let (state, failures) = self.breaker.snapshot();
        self.telemetry.snapshot(failures, state)
    }

    /// Issue a `GET` with retries, backoff, and circuit breaker protection
    ///
    /// # Errors
    ///
    /// - `ProviderError::CircuitBreakerOpen` when the circuit is open (no attempt is made)
    /// - `ProviderError::ApiError` for a fatal status or 5xx after the retry budget
    /// - `ProviderError::RateLimitExceeded` for 429 after the retry budget
    /// - `ProviderError::NetworkError` for timeouts or connection failures after the retry budget
    pub async fn get(&self, url: &str, options: &RequestOptions) -> ProviderResult<UpstreamResponse> {
        if !self.breaker.is_allowed() {
            let retry_after_secs = self.breaker.retry_after_secs();
            warn!(
                provider = %self.provider,
                url,
                retry_after_secs,
                "Circuit breaker open, request blocked"
            );
            return Err(ProviderError::CircuitBreakerOpen {
                provider: self.provider.clone(),
                retry_after_secs,
            });
        }

        self.telemetry.record_request();
        let result = self.execute_with_retries(url, options).await;

        if result.is_ok() {
            self.breaker.record_success();
        } else {
            self.telemetry.record_error();
            self.breaker.record_failure();
        }
        result
    }

    async fn execute_with_retries(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> ProviderResult<UpstreamResponse> {
        let timeout = options.timeout.unwrap_or(self.config.default_timeout);
        let mut attempt: u32 = 0;

        loop {
            self.telemetry.record_attempt();
            debug!(provider = %self.provider, url, attempt = attempt + 1, "Making upstream request");

            let failure = match self.transport.get(url, options, timeout).await {
                Ok(response) if response.is_success() => {
                    AttemptRecord {
                        attempt,
                        url,
                        delay: None,
                        outcome: AttemptOutcome::Success,
                    }
                    .emit(&self.provider);
                    return Ok(response);
                }
                Ok(response) => self.classify_response(&response, attempt),
                Err(error) => {
                    warn!(
                        provider = %self.provider,
                        url,
                        attempt = attempt + 1,
                        error = %error,
                        "Network error on upstream request"
                    );
                    Failure::Retryable {
                        error: error.into_provider_error(&self.provider),
                        rate_limit_hint: None,
                    }
                }
            };

            match failure {
                Failure::Fatal(error) => {
                    AttemptRecord {
                        attempt,
                        url,
                        delay: None,
                        outcome: AttemptOutcome::FatalFailure,
                    }
                    .emit(&self.provider);
                    return Err(error);
                }
                Failure::Retryable { error, .. } if attempt >= self.config.max_retries => {
                    warn!(
                        provider = %self.provider,
                        url,
                        attempts = attempt + 1,
                        error = %error,
                        "Retry budget exhausted"
                    );
                    return Err(error);
                }
                Failure::Retryable {
                    rate_limit_hint, ..
                } => {
                    let delay = match rate_limit_hint {
                        Some(hint) => self.backoff.rate_limited_delay(hint.as_deref(), attempt),
                        None => self.backoff.exponential_delay(attempt),
                    };
                    AttemptRecord {
                        attempt,
                        url,
                        delay: Some(delay),
                        outcome: AttemptOutcome::RetryableFailure,
                    }
                    .emit(&self.provider);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn classify_response(&self, response: &UpstreamResponse, attempt: u32) -> Failure {
        let status = response.status();

        if status == 429 {
            self.telemetry.record_rate_limit();
            let hint = response.retry_after().map(str::to_owned);
            return Failure::Retryable {
                error: ProviderError::RateLimitExceeded {
                    provider: self.provider.clone(),
                    retry_after_secs: hint
                        .as_deref()
                        .and_then(parse_retry_after)
                        .map(|d| d.as_secs_f64().ceil() as u64),
                    attempts: attempt + 1,
                },
                rate_limit_hint: Some(hint),
            };
        }

        // Only 500/502/503/504 are transient; 501, 505 and other 5xx are final answers
        let retryable = RETRYABLE_SERVER_STATUSES.contains(&status);
        let error = ProviderError::ApiError {
            provider: self.provider.clone(),
            status_code: status,
            message: error_excerpt(response),
            retryable,
        };

        if retryable {
            Failure::Retryable {
                error,
                rate_limit_hint: None,
            }
        } else {
            Failure::Fatal(error)
        }
    }
}

impl<T: HttpTransport + 'static> ResilientHttpClient<T> {
    /// Run [`get`](Self::get) on a spawned task
    ///
    /// The retry loop and its sleeps then progress independently of the
    /// caller, which can await the handle whenever it needs the result.
    pub fn spawn_get(
        self: &Arc<Self>,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> JoinHandle<ProviderResult<UpstreamResponse>> {
        let client = Arc::clone(self);
        let url = url.into();
        tokio::spawn(async move { client.get(&url, &options).await })
    }
}

fn error_excerpt(response: &UpstreamResponse) -> String {
    let text = response.text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return format!("upstream returned status {}", response.status());
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
