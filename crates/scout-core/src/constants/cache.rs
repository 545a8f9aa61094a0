// ABOUTME: Cache-related constants for namespace TTLs and cleanup intervals
// ABOUTME: TTLs reflect how volatile each kind of football data is
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

/// Player profile TTL (30 minutes)
pub const TTL_PLAYER_SECS: u64 = 1_800;

/// Season statistics TTL (1 hour)
pub const TTL_STATS_SECS: u64 = 3_600;

/// Market listing TTL (2 hours)
pub const TTL_MARKET_SECS: u64 = 7_200;

/// League metadata TTL (24 hours) - near static
pub const TTL_LEAGUE_SECS: u64 = 86_400;

/// Search results TTL (15 minutes) - highly volatile
pub const TTL_SEARCH_SECS: u64 = 900;

/// Default interval for the optional background sweep
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Well-known key of the full league list
pub const LEAGUES_ALL_KEY: &str = "leagues_all";

/// Tag prefix linking cross-namespace entries to a player
pub const PLAYER_TAG_PREFIX: &str = "player:";
