// ABOUTME: Backoff policy for retrying upstream requests
// ABOUTME: Capped exponential delays with uniform jitter plus Retry-After handling for 429s
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use rand::Rng;
use std::time::Duration;

use crate::constants::http_client::{DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CAP_MS};

/// Delay policy between retry attempts
///
/// The exponential delay for attempt `n` (zero based) is
/// `min(base * 2^n, cap) + uniform(0, base)`, so no computed delay ever
/// exceeds `cap + base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            cap: Duration::from_millis(DEFAULT_BACKOFF_CAP_MS),
        }
    }
}

impl BackoffPolicy {
    /// Create a policy from a base delay and a per-delay ceiling
    #[must_use]
    pub const fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Base delay
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Ceiling applied before jitter
    #[must_use]
    pub const fn cap(&self) -> Duration {
        self.cap
    }

    /// Largest delay this policy can produce
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.cap.saturating_add(self.base)
    }

    /// Exponential delay with jitter for a zero-based attempt index
    #[must_use]
    pub fn exponential_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let exponential = self.base.saturating_mul(factor).min(self.cap);
        exponential.saturating_add(self.jitter())
    }

    /// Delay after a rate-limited response
    ///
    /// Honors the provider's `Retry-After` hint (capped) and falls back to the
    /// exponential formula when the hint is missing or unparsable.
    #[must_use]
    pub fn rate_limited_delay(&self, retry_after: Option<&str>, attempt: u32) -> Duration {
        retry_after
            .and_then(parse_retry_after)
            .map_or_else(|| self.exponential_delay(attempt), |hint| hint.min(self.cap))
    }

    fn jitter(&self) -> Duration {
        self.base.mul_f64(rand::thread_rng().gen::<f64>())
    }
}

/// Parse a `Retry-After` value expressed in (possibly fractional) seconds
///
/// HTTP-date values, negative numbers and `NaN` yield `None`. Values too large
/// for a `Duration`, infinity included, saturate to `Duration::MAX`.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs = value.trim().parse::<f64>().ok()?;
    if secs.is_nan() || secs < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}
