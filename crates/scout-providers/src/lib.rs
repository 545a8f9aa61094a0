// ABOUTME: Resilient access to upstream football data providers
// ABOUTME: Circuit breaker, backoff policy, HTTP transport seam, and the retrying client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! Upstream data provider access.
//!
//! [`ResilientHttpClient`] wraps every outbound `GET` with bounded retries,
//! exponential backoff with jitter, `Retry-After` aware sleeps, and a
//! consecutive-failure [`CircuitBreaker`]. The network itself sits behind the
//! [`HttpTransport`] trait so the retry policy can be exercised without sockets.

// Re-export scout-core modules so provider code can keep `use crate::errors::*`
pub use scout_core::constants;
pub use scout_core::errors;

/// Exponential backoff with jitter and `Retry-After` handling
pub mod backoff;
/// Circuit breaker with lazy reset for upstream calls
pub mod circuit_breaker;
/// HTTP transport seam and the reqwest-backed implementation
pub mod http_client;
/// Retrying client combining transport, backoff, breaker, and telemetry
pub mod resilient;
/// Request counters and read-only snapshots
pub mod telemetry;

pub use backoff::{parse_retry_after, BackoffPolicy};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use http_client::{HttpTransport, ReqwestTransport, RequestOptions, TransportError, UpstreamResponse};
pub use resilient::{ResilientClientConfig, ResilientHttpClient};
pub use scout_core::errors::provider::{ProviderError, ProviderResult};
pub use telemetry::{ClientTelemetry, TelemetrySnapshot};
