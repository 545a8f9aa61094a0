// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for caching, outbound HTTP, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than kept in a single file.

/// Cache-related constants (namespace TTLs, cleanup intervals, well-known keys)
pub mod cache;
/// Outbound HTTP client defaults (timeouts, retry budget, breaker thresholds)
pub mod http_client;

/// Service identifiers used in structured logs
pub mod service_names {
    /// Name of the scouting API server
    pub const SCOUT_SERVER: &str = "soccer-scout";
    /// Upstream football data provider
    pub const SPORTMONKS: &str = "sportmonks";
}

/// Network defaults
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}

/// Sportmonks API defaults
pub mod sportmonks {
    /// Football API base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.sportmonks.com/v3/football";
    /// Includes requested for a complete player profile
    pub const PLAYER_PROFILE_INCLUDES: &str =
        "position,team,country,statistics,transfers,sidelined,trophies,metadata";
    /// Includes requested for season statistics
    pub const SEASON_STATS_INCLUDES: &str = "league,team,type";
}
