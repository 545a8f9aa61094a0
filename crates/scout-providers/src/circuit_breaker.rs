// ABOUTME: Circuit breaker pattern implementation for upstream provider API calls
// ABOUTME: Fails fast after consecutive failures and lazily resets on the next call after a timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::constants::http_client::{
    DEFAULT_CIRCUIT_BREAKER_THRESHOLD, DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS,
};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Normal operation - requests pass through
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive failures before opening circuit
    pub failure_threshold: u32,
    /// Time since the last failure after which the next call is let through
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            reset_timeout: Duration::from_secs(DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS),
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new circuit breaker configuration
    #[must_use]
    pub const fn new(failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            reset_timeout,
        }
    }
}

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    open: bool,
    last_failure: Option<Instant>,
}

/// Thread-safe circuit breaker for upstream API calls
///
/// # States
///
/// - **Closed**: requests pass through; consecutive failures are counted and
///   any success resets the count.
/// - **Open**: entered once the count reaches the threshold; every call is
///   rejected without touching the network.
///
/// There is no background timer. The first [`is_allowed`](Self::is_allowed)
/// check made after `reset_timeout` has elapsed since the last failure closes
/// the circuit and clears the counter, and the outcome of that call decides
/// whether it trips again. With no traffic an open circuit stays open.
///
/// # Thread Safety
///
/// State transitions happen under a single mutex so the counter, the open
/// flag and the failure timestamp are always observed together.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Provider name for logging and error messages
    provider_name: String,
    state: Mutex<BreakerState>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default configuration
    #[must_use]
    pub fn new(provider_name: &str) -> Self {
        Self::with_config(provider_name, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom configuration
    #[must_use]
    pub fn with_config(provider_name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            provider_name: provider_name.to_owned(),
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!(provider = %self.provider_name, "Circuit breaker lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Current circuit state, without attempting a reset
    #[must_use]
    pub fn state(&self) -> CircuitState {
        if self.lock_state().open {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }

    /// Current consecutive failure count
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.lock_state().consecutive_failures
    }

    /// State and failure count read under a single lock
    #[must_use]
    pub fn snapshot(&self) -> (CircuitState, u32) {
        let state = self.lock_state();
        let circuit = if state.open {
            CircuitState::Open
        } else {
            CircuitState::Closed
        };
        (circuit, state.consecutive_failures)
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Check if the circuit allows a call, resetting it if the timeout has elapsed
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        let mut state = self.lock_state();
        if !state.open {
            return true;
        }

        let since_failure = state
            .last_failure
            .map_or(Duration::MAX, |at| at.elapsed());
        if since_failure < self.config.reset_timeout {
            return false;
        }

        state.open = false;
        state.consecutive_failures = 0;
        drop(state);
        info!(
            provider = %self.provider_name,
            "Circuit breaker reset after timeout, letting request through"
        );
        true
    }

    /// Record a successful call
    pub fn record_success(&self) {
        let mut state = self.lock_state();
        state.consecutive_failures = 0;
        if state.open {
            state.open = false;
            drop(state);
            info!(
                provider = %self.provider_name,
                "Circuit breaker closed after successful request"
            );
        }
    }

    /// Record a failed call, opening the circuit once the threshold is reached
    pub fn record_failure(&self) {
        let mut state = self.lock_state();
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.last_failure = Some(Instant::now());

        let failures = state.consecutive_failures;
        if failures >= self.config.failure_threshold && !state.open {
            state.open = true;
            drop(state);
            warn!(
                provider = %self.provider_name,
                failures,
                threshold = self.config.failure_threshold,
                reset_timeout_secs = self.config.reset_timeout.as_secs(),
                "Circuit breaker opened - provider failing"
            );
        }
    }

    /// Time remaining until an open circuit lets a call through
    ///
    /// Zero when the circuit is closed or the timeout has already elapsed.
    #[must_use]
    pub fn time_until_recovery(&self) -> Duration {
        let state = self.lock_state();
        if !state.open {
            return Duration::ZERO;
        }
        state.last_failure.map_or(Duration::ZERO, |at| {
            self.config.reset_timeout.saturating_sub(at.elapsed())
        })
    }

    /// [`time_until_recovery`](Self::time_until_recovery) in whole seconds, rounded up
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        let remaining = self.time_until_recovery();
        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// Force reset the circuit breaker to closed state
    ///
    /// Use sparingly - this should typically only be called during testing
    /// or after manual verification that a provider has recovered.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        *state = BreakerState::default();
        drop(state);
        info!(
            provider = %self.provider_name,
            "Circuit breaker manually reset to closed state"
        );
    }
}
