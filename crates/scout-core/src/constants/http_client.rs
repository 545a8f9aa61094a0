// ABOUTME: Defaults for the resilient outbound HTTP client
// ABOUTME: Timeouts, retry budget, backoff bounds, and circuit breaker thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

/// Per-attempt request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Connection establishment timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Retry attempts after the first one
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Base delay for exponential backoff in milliseconds
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Ceiling for a single backoff delay in milliseconds
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 8_000;

/// Consecutive failures before the circuit opens
pub const DEFAULT_CIRCUIT_BREAKER_THRESHOLD: u32 = 5;

/// Seconds before an open circuit lets a call through again
pub const DEFAULT_CIRCUIT_RESET_TIMEOUT_SECS: u64 = 60;

/// Server error statuses that are retried with exponential backoff
pub const RETRYABLE_SERVER_STATUSES: [u16; 4] = [500, 502, 503, 504];
