// ABOUTME: Composition root owning the cache, HTTP client and data service for the server lifetime
// ABOUTME: Built once at startup from ServerConfig and torn down explicitly at shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! Shared server resources
//!
//! Nothing in the crate is a process-wide singleton: the binary builds one
//! [`ServerResources`] and hands an `Arc` of it to the router.

use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::cache::SmartCache;
use crate::config::environment::ServerConfig;
use crate::constants::service_names::SPORTMONKS;
use crate::errors::{AppError, AppResult};
use crate::external::SportmonksClient;
use crate::providers::{ResilientHttpClient, TelemetrySnapshot};

/// Long-lived components shared by request handlers
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Namespaced TTL cache
    pub cache: Arc<SmartCache>,
    /// Resilient client for the Sportmonks API
    pub http_client: Arc<ResilientHttpClient>,
    /// Cache-first Sportmonks data service
    pub sportmonks: Arc<SportmonksClient>,
}

impl ServerResources {
    /// Build every component from configuration
    ///
    /// Starts background cache cleanup when enabled and a tokio runtime is
    /// available.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client settings are invalid
    /// or the client cannot be built
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let client_config = config.http_client.to_client_config()?;
        let http_client = Arc::new(
            ResilientHttpClient::new(SPORTMONKS, client_config)
                .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?,
        );

        let cache = Arc::new(SmartCache::new(&config.cache));
        if config.cache.enable_background_cleanup {
            if Handle::try_current().is_ok() {
                cache.start_background_cleanup(config.cache.cleanup_interval());
            } else {
                warn!("No tokio runtime available, background cache cleanup not started");
            }
        }

        let sportmonks = Arc::new(SportmonksClient::new(
            config.sportmonks.clone(),
            Arc::clone(&http_client),
            Arc::clone(&cache),
        ));

        info!("Server resources initialized");
        Ok(Self {
            config: Arc::new(config),
            cache,
            http_client,
            sportmonks,
        })
    }

    /// Snapshot of the Sportmonks client's counters
    #[must_use]
    pub fn http_telemetry(&self) -> TelemetrySnapshot {
        self.http_client.telemetry()
    }

    /// Stop background work and drop cached data
    pub async fn shutdown(&self) {
        self.cache.stop_background_cleanup().await;
        let cleared = self.cache.clear_all();
        info!(cleared, "Server resources shut down");
    }
}
