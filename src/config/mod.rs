// ABOUTME: Configuration management module for server, cache and HTTP client settings
// ABOUTME: Environment-only configuration with typed sections and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! Configuration for the scouting server
//!
//! - **Environment**: server, network and data provider settings
//! - **Cache**: namespace TTLs and background cleanup
//! - **HTTP client**: retry budget, backoff and circuit breaker tuning

/// Cache configuration
pub mod cache;
/// Environment and server configuration
pub mod environment;
/// Outbound HTTP client configuration
pub mod http_client;

pub use cache::{CacheConfig, CacheTtlConfig};
pub use environment::{ServerConfig, SportmonksConfig};
pub use http_client::HttpClientConfig;
