// ABOUTME: Namespaced TTL cache for upstream football data
// ABOUTME: Namespace definitions, stable key derivation and statistics snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

/// Single-namespace in-memory TTL cache
pub mod memory;
/// Namespaced facade with typed accessors and background cleanup
pub mod smart;

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

pub use crate::config::cache::{CacheConfig, CacheTtlConfig};
pub use memory::InMemoryCache;
pub use smart::{SmartCache, SmartCacheStats};

/// Data categories, each with its own store, TTL and counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheNamespace {
    /// Player profiles
    Player,
    /// Per-season player statistics
    Stats,
    /// Market listings by position and league
    Market,
    /// League catalogue
    League,
    /// Search results
    Search,
}

impl CacheNamespace {
    /// Every namespace, in a fixed order
    pub const ALL: [Self; 5] = [
        Self::Player,
        Self::Stats,
        Self::Market,
        Self::League,
        Self::Search,
    ];

    /// Prefix mixed into keys of this namespace
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Stats => "stats",
            Self::Market => "market",
            Self::League => "league",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Derive a cache key as `hex(sha256(prefix ":" arg1 ":" arg2 ...))`
///
/// The digest is stable across processes, so keys can be reproduced from
/// the same arguments. Argument order matters.
#[must_use]
pub fn make_key(prefix: &str, args: &[&str]) -> String {
    let mut material = String::from(prefix);
    material.push(':');
    material.push_str(&args.join(":"));
    hex::encode(Sha256::digest(material.as_bytes()))
}

/// Hit/miss/set/eviction counters for one namespace
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Writes
    pub sets: u64,
    /// Entries removed because they expired
    pub evictions: u64,
    /// `hits / max(hits + misses, 1)`
    pub hit_rate: f64,
    /// Entries currently stored, including expired ones not yet swept
    pub total_entries: usize,
    /// `hits + misses`
    pub total_requests: u64,
}

impl CacheStats {
    /// Build a snapshot from raw counters
    #[must_use]
    pub fn new(hits: u64, misses: u64, sets: u64, evictions: u64, total_entries: usize) -> Self {
        let total_requests = hits + misses;
        Self {
            hits,
            misses,
            sets,
            evictions,
            hit_rate: hits as f64 / total_requests.max(1) as f64,
            total_entries,
            total_requests,
        }
    }
}
