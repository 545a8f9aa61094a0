// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Quiet logging, scripted fake transport, fixtures and cache/client builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `soccer_scout`

use async_trait::async_trait;
use soccer_scout::cache::{CacheConfig, SmartCache};
use soccer_scout::config::environment::{ServerConfig, SportmonksConfig};
use soccer_scout::config::HttpClientConfig;
use soccer_scout::resources::ServerResources;
use soccer_scout::providers::{
    HttpTransport, RequestOptions, ResilientClientConfig, TransportError, UpstreamResponse,
};
use std::collections::VecDeque;
use std::env;
use std::future::pending;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::time::Instant;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests
///
/// Set `TEST_LOG=DEBUG` (or `TRACE`, `INFO`) to see client and cache events.
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// One scripted reply of the fake transport
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Respond with a status and body
    Status(u16, &'static str),
    /// Respond 429 with an optional `Retry-After` value
    RateLimited(Option<&'static str>),
    /// Fail with a timeout
    Timeout,
    /// Fail to connect
    ConnectError,
    /// Never answer; the caller must be cancelled
    Hang,
}

/// Transport that replays a script and records when each attempt happened
///
/// Once the script is exhausted the last entry repeats.
pub struct FakeTransport {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl FakeTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
        }
    }

    /// Same reply forever
    pub fn always(reply: Scripted) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    /// Gaps between consecutive attempts
    pub fn gaps(&self) -> Vec<Duration> {
        self.call_times()
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Scripted {
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = next {
            *last = Some(reply.clone());
            reply
        } else {
            last.clone().unwrap_or(Scripted::Status(200, "{}"))
        }
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(
        &self,
        _url: &str,
        _options: &RequestOptions,
        timeout: Duration,
    ) -> Result<UpstreamResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        self.timeouts.lock().unwrap().push(timeout);

        match self.next_reply() {
            Scripted::Status(status, body) => Ok(UpstreamResponse::new(status, body)),
            Scripted::RateLimited(Some(hint)) => {
                Ok(UpstreamResponse::new(429, "slow down").with_retry_after(hint))
            }
            Scripted::RateLimited(None) => Ok(UpstreamResponse::new(429, "slow down")),
            Scripted::Timeout => Err(TransportError::Timeout("attempt timed out".to_owned())),
            Scripted::ConnectError => {
                Err(TransportError::Connect("connection refused".to_owned()))
            }
            Scripted::Hang => pending().await,
        }
    }
}

/// Client settings with small, easy to reason about numbers
pub fn fast_client_config(max_retries: u32, threshold: u32) -> ResilientClientConfig {
    ResilientClientConfig {
        default_timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(1),
        max_retries,
        backoff_base: Duration::from_millis(100),
        backoff_cap: Duration::from_secs(2),
        circuit_breaker_threshold: threshold,
        circuit_reset_timeout: Duration::from_secs(30),
    }
}

/// Cache with default TTLs and no background task
pub fn test_cache() -> Arc<SmartCache> {
    Arc::new(SmartCache::new(&CacheConfig::default()))
}

/// Server configuration pointing the Sportmonks client at a mock server
pub fn test_server_config(base_url: &str) -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        sportmonks: SportmonksConfig {
            api_key: Some("test-token".to_owned()),
            base_url: base_url.trim_end_matches('/').to_owned(),
        },
        http_client: HttpClientConfig {
            max_retries: 1,
            backoff_base_secs: 0.01,
            backoff_cap_secs: 0.02,
            circuit_breaker_threshold: 3,
            ..defaults.http_client
        },
        ..defaults
    }
}

/// Shared resources whose Sportmonks client talks to `base_url`
pub fn test_resources(base_url: &str) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(test_server_config(base_url)).unwrap())
}

/// Sportmonks-style player payload
pub fn player_body(player_id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "id": player_id,
            "display_name": name,
            "position_id": 27,
            "nationality_id": 32,
        }
    })
}

/// Sportmonks-style league list payload
pub fn leagues_body() -> serde_json::Value {
    serde_json::json!({
        "data": [
            {"id": 8, "name": "Premier League"},
            {"id": 564, "name": "La Liga"}
        ]
    })
}
