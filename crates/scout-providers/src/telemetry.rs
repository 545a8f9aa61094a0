// ABOUTME: Running counters for the resilient HTTP client
// ABOUTME: Lock-free increments with a serializable read-only snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::circuit_breaker::CircuitState;

/// Counters shared by every call issued through one client
#[derive(Debug, Default)]
pub struct ClientTelemetry {
    requests: AtomicU64,
    attempts: AtomicU64,
    errors: AtomicU64,
    rate_limits: AtomicU64,
}

impl ClientTelemetry {
    /// A logical request passed the circuit breaker
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// A network attempt was made (first try or retry)
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// A logical request ended in failure
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// The provider answered 429
    pub fn record_rate_limit(&self) {
        self.rate_limits.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters together with the breaker's view
    #[must_use]
    pub fn snapshot(&self, consecutive_failures: u32, circuit_state: CircuitState) -> TelemetrySnapshot {
        let total_requests = self.requests.load(Ordering::Relaxed);
        let total_errors = self.errors.load(Ordering::Relaxed);

        TelemetrySnapshot {
            total_requests,
            total_attempts: self.attempts.load(Ordering::Relaxed),
            total_errors,
            rate_limits: self.rate_limits.load(Ordering::Relaxed),
            error_rate: total_errors as f64 / total_requests.max(1) as f64,
            consecutive_failures,
            circuit_open: circuit_state == CircuitState::Open,
            circuit_state,
        }
    }
}

/// Read-only view of a client's counters
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    /// Logical requests that reached the network
    pub total_requests: u64,
    /// Network attempts, retries included
    pub total_attempts: u64,
    /// Logical requests that failed
    pub total_errors: u64,
    /// 429 responses received
    pub rate_limits: u64,
    /// `total_errors / max(total_requests, 1)`
    pub error_rate: f64,
    /// Current consecutive failure count
    pub consecutive_failures: u32,
    /// Whether the circuit is open
    pub circuit_open: bool,
    /// Current circuit state
    pub circuit_state: CircuitState,
}
