// ABOUTME: Environment configuration management for the scouting server
// ABOUTME: Aggregates network, cache, HTTP client and data provider settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! Environment-based configuration for deployment

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use tracing::{info, warn};

use super::cache::CacheConfig;
use super::http_client::HttpClientConfig;
use crate::constants::{ports, sportmonks};
use crate::errors::{AppError, AppResult};

/// Sportmonks data API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct SportmonksConfig {
    /// API token sent as a bearer token; requests go out unauthenticated without it
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of the football API
    pub base_url: String,
}

impl fmt::Debug for SportmonksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SportmonksConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for SportmonksConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: sportmonks::DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl SportmonksConfig {
    /// Load Sportmonks configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("SPORTMONKS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("SPORTMONKS_BASE_URL")
                .map_or_else(
                    |_| sportmonks::DEFAULT_BASE_URL.to_owned(),
                    |url| url.trim_end_matches('/').to_owned(),
                ),
        }
    }

    /// Whether an API key is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Preload popular data into the cache at startup
    pub warm_cache_on_startup: bool,
    /// Cache settings
    pub cache: CacheConfig,
    /// Outbound HTTP client settings
    pub http_client: HttpClientConfig,
    /// Sportmonks API settings
    pub sportmonks: SportmonksConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: ports::DEFAULT_HOST.to_owned(),
            http_port: ports::DEFAULT_HTTP_PORT,
            warm_cache_on_startup: false,
            cache: CacheConfig::default(),
            http_client: HttpClientConfig::default(),
            sportmonks: SportmonksConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| ports::DEFAULT_HOST.to_owned()),
            http_port: env::var("HTTP_PORT")
                .or_else(|_| env::var("PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(ports::DEFAULT_HTTP_PORT),
            warm_cache_on_startup: env::var("CACHE_WARM_ON_STARTUP")
                .is_ok_and(|v| v == "true" || v == "1"),
            cache: CacheConfig::from_env(),
            http_client: HttpClientConfig::from_env(),
            sportmonks: SportmonksConfig::from_env(),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable HTTP client configuration or an empty host
    pub fn validate(&self) -> AppResult<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::config("HOST must not be empty"));
        }
        self.http_client.to_client_config()?;

        if !self.sportmonks.is_configured() {
            warn!("SPORTMONKS_API_KEY not set; upstream requests will be unauthenticated");
        }
        Ok(())
    }

    /// Socket address string the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Soccer Scout Server Configuration:\n\
             - Bind Address: {}\n\
             - Sportmonks API: {} ({})\n\
             - HTTP Client: timeout {}s, {} retries, backoff {}s..{}s\n\
             - Circuit Breaker: threshold {}, reset after {}s\n\
             - Cache TTLs: player {}s, stats {}s, market {}s, league {}s, search {}s\n\
             - Background Cleanup: {} (every {}s)\n\
             - Warm Cache On Startup: {}",
            self.bind_address(),
            if self.sportmonks.is_configured() {
                "Enabled"
            } else {
                "No API key"
            },
            self.sportmonks.base_url,
            self.http_client.timeout_secs,
            self.http_client.max_retries,
            self.http_client.backoff_base_secs,
            self.http_client.backoff_cap_secs,
            self.http_client.circuit_breaker_threshold,
            self.http_client.circuit_reset_timeout_secs,
            self.cache.ttl.player_secs,
            self.cache.ttl.stats_secs,
            self.cache.ttl.market_secs,
            self.cache.ttl.league_secs,
            self.cache.ttl.search_secs,
            if self.cache.enable_background_cleanup {
                "Enabled"
            } else {
                "Disabled"
            },
            self.cache.cleanup_interval_secs,
            self.warm_cache_on_startup,
        )
    }
}
