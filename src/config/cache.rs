// ABOUTME: Cache configuration types for the namespaced TTL cache
// ABOUTME: Per-namespace TTLs and background cleanup settings loaded from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::cache::CacheNamespace;
use crate::constants::cache;

/// Cache configuration for the in-process namespaced cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache cleanup interval in seconds
    pub cleanup_interval_secs: u64,
    /// Run a periodic sweep task in addition to sweep-on-read
    pub enable_background_cleanup: bool,
    /// Cache TTL configuration
    #[serde(default)]
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: cache::DEFAULT_CLEANUP_INTERVAL_SECS,
            // Tests construct caches outside a runtime; the server opts in
            enable_background_cleanup: false,
            ttl: CacheTtlConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            cleanup_interval_secs: env::var("CACHE_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(cache::DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: env::var("CACHE_BACKGROUND_CLEANUP")
                .map_or(true, |v| v == "true" || v == "1"),
            ttl: CacheTtlConfig::from_env(),
        }
    }

    /// Cleanup interval as a duration
    #[must_use]
    pub const fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Default TTL for each cache namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// Player profile TTL in seconds (default: 30 minutes)
    pub player_secs: u64,
    /// Season statistics TTL in seconds (default: 1 hour)
    pub stats_secs: u64,
    /// Market listing TTL in seconds (default: 2 hours)
    pub market_secs: u64,
    /// League list TTL in seconds (default: 24 hours)
    pub league_secs: u64,
    /// Search results TTL in seconds (default: 15 minutes)
    pub search_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            player_secs: cache::TTL_PLAYER_SECS,
            stats_secs: cache::TTL_STATS_SECS,
            market_secs: cache::TTL_MARKET_SECS,
            league_secs: cache::TTL_LEAGUE_SECS,
            search_secs: cache::TTL_SEARCH_SECS,
        }
    }
}

impl CacheTtlConfig {
    /// Load cache TTL configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            player_secs: env::var("CACHE_TTL_PLAYER_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cache::TTL_PLAYER_SECS),
            stats_secs: env::var("CACHE_TTL_STATS_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cache::TTL_STATS_SECS),
            market_secs: env::var("CACHE_TTL_MARKET_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cache::TTL_MARKET_SECS),
            league_secs: env::var("CACHE_TTL_LEAGUE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cache::TTL_LEAGUE_SECS),
            search_secs: env::var("CACHE_TTL_SEARCH_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cache::TTL_SEARCH_SECS),
        }
    }

    /// Get the default TTL for a namespace
    #[must_use]
    pub const fn ttl_for(&self, namespace: CacheNamespace) -> Duration {
        let secs = match namespace {
            CacheNamespace::Player => self.player_secs,
            CacheNamespace::Stats => self.stats_secs,
            CacheNamespace::Market => self.market_secs,
            CacheNamespace::League => self.league_secs,
            CacheNamespace::Search => self.search_secs,
        };
        Duration::from_secs(secs)
    }
}
