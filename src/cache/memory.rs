// ABOUTME: In-memory TTL cache for a single namespace with hit/miss telemetry
// ABOUTME: Sweeps expired entries on every read; all mutations happen under one mutex
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{CacheNamespace, CacheStats};
use crate::config::cache::CacheTtlConfig;
use crate::errors::{AppError, AppResult};

/// Longest TTL honored; larger values are clamped so deadlines never overflow
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    created_at: Instant,
    expires_at: Instant,
    tag: Option<String>,
}

impl CacheEntry {
    fn new(value: Value, ttl: Duration, tag: Option<String>) -> Self {
        let created_at = Instant::now();
        Self {
            value,
            created_at,
            expires_at: created_at + ttl.min(MAX_TTL),
            tag,
        }
    }

    // Strictly after the deadline; an entry read exactly at expires_at is still live
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    fn remaining_ttl(&self, now: Instant) -> Option<Duration> {
        if self.is_expired(now) {
            None
        } else {
            Some(self.expires_at.saturating_duration_since(now))
        }
    }
}

#[derive(Debug, Default)]
struct Store {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
    sets: u64,
    evictions: u64,
}

impl Store {
    fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();
        self.evictions += removed as u64;
        removed
    }
}

/// TTL cache for one namespace
///
/// Values are kept as live `serde_json::Value` trees; typed accessors convert
/// on the way in and out. There is no capacity limit: entries leave only by
/// expiry, deletion or [`clear`](Self::clear).
///
/// Every read first sweeps all expired entries (counting each as an eviction),
/// so an expired entry is never returned even between background sweeps.
#[derive(Debug)]
pub struct InMemoryCache {
    name: String,
    default_ttl: Duration,
    store: Mutex<Store>,
}

impl InMemoryCache {
    /// Create an empty cache with the given default TTL
    #[must_use]
    pub fn new(name: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            name: name.into(),
            default_ttl,
            store: Mutex::new(Store::default()),
        }
    }

    /// Create the cache backing a namespace, using its configured TTL
    #[must_use]
    pub fn for_namespace(namespace: CacheNamespace, ttl: &CacheTtlConfig) -> Self {
        Self::new(namespace.prefix(), ttl.ttl_for(namespace))
    }

    /// Namespace name used in logs
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// TTL applied by [`set`](Self::set)
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| {
            warn!(namespace = %self.name, "Cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up the raw value for a key
    ///
    /// Expired entries are swept first; a live entry counts as a hit, anything
    /// else as a miss.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        let mut store = self.lock();

        let swept = store.sweep(now);
        let value = store.entries.get(key).map(|entry| entry.value.clone());
        if value.is_some() {
            store.hits += 1;
        } else {
            store.misses += 1;
        }
        drop(store);

        if swept > 0 {
            debug!(namespace = %self.name, swept, "Swept expired cache entries");
        }
        value
    }

    /// Look up and deserialize the value for a key
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the stored value does not match `T`.
    /// A missing or expired entry is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        self.get_value(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|e| {
                    AppError::serialization(format!(
                        "Cached value in '{}' has an unexpected shape",
                        self.name
                    ))
                    .with_source(e)
                })
            })
            .transpose()
    }

    /// Store a value with the namespace's default TTL
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` cannot be converted to JSON
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    /// Store a value with an explicit TTL
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` cannot be converted to JSON
    pub fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let value = self.to_value(value)?;
        self.insert(key, value, ttl, None);
        Ok(())
    }

    /// Store a value and label it so it can later be removed by tag
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` cannot be converted to JSON
    pub fn set_tagged<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
        tag: &str,
    ) -> AppResult<()> {
        let value = self.to_value(value)?;
        self.insert(key, value, ttl, Some(tag.to_owned()));
        Ok(())
    }

    /// Store an already materialized JSON value
    pub fn set_value(&self, key: &str, value: Value, ttl: Duration) {
        self.insert(key, value, ttl, None);
    }

    fn to_value<T: Serialize + ?Sized>(&self, value: &T) -> AppResult<Value> {
        serde_json::to_value(value).map_err(|e| {
            AppError::serialization(format!("Failed to serialize value for '{}'", self.name))
                .with_source(e)
        })
    }

    // Overwrites unconditionally; replacing a live entry is not an eviction
    fn insert(&self, key: &str, value: Value, ttl: Duration, tag: Option<String>) {
        let entry = CacheEntry::new(value, ttl, tag);
        let mut store = self.lock();
        store.entries.insert(key.to_owned(), entry);
        store.sets += 1;
    }

    /// Remove a key, reporting whether it was present
    pub fn delete(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Remove every entry stored with the given tag, returning how many were removed
    pub fn delete_tagged(&self, tag: &str) -> usize {
        let mut store = self.lock();
        let before = store.entries.len();
        store
            .entries
            .retain(|_, entry| entry.tag.as_deref() != Some(tag));
        before - store.entries.len()
    }

    /// Drop every entry, returning how many were removed; counters are kept
    pub fn clear(&self) -> usize {
        let mut store = self.lock();
        let removed = store.entries.len();
        store.entries.clear();
        removed
    }

    /// Remove expired entries, returning how many were evicted
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        self.lock().sweep(now)
    }

    /// Whether a live entry exists, without touching hit/miss counters
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.remaining_ttl(key).is_some()
    }

    /// Time left before a key expires, without touching hit/miss counters
    #[must_use]
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .entries
            .get(key)
            .and_then(|entry| entry.remaining_ttl(now))
    }

    /// Age of a live entry
    #[must_use]
    pub fn age(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| now.saturating_duration_since(entry.created_at))
    }

    /// Entries currently stored, including expired ones not yet swept
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no entries are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of this namespace's counters
    #[must_use]
    pub fn get_stats(&self) -> CacheStats {
        let store = self.lock();
        CacheStats::new(
            store.hits,
            store.misses,
            store.sets,
            store.evictions,
            store.entries.len(),
        )
    }
}
