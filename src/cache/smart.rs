// ABOUTME: Namespaced cache facade with typed accessors for players, stats, markets, leagues and searches
// ABOUTME: Derives stable hashed keys, aggregates statistics and runs an optional periodic sweep
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::memory::InMemoryCache;
use super::{make_key, CacheConfig, CacheNamespace, CacheStats};
use crate::constants::cache::{LEAGUES_ALL_KEY, PLAYER_TAG_PREFIX};
use crate::errors::AppResult;

struct CleanupTask {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Five independent TTL caches behind one facade
///
/// Each namespace has its own store, default TTL and counters, so traffic in
/// one never affects another. Keys are `hex(sha256(prefix:args))` except for
/// the league catalogue, which lives under the fixed key `leagues_all`.
pub struct SmartCache {
    player: InMemoryCache,
    stats: InMemoryCache,
    market: InMemoryCache,
    league: InMemoryCache,
    search: InMemoryCache,
    cleanup: Mutex<Option<CleanupTask>>,
}

impl SmartCache {
    /// Create the five namespaces with the configured TTLs
    ///
    /// Background cleanup is not started here; see
    /// [`start_background_cleanup`](Self::start_background_cleanup).
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = &config.ttl;
        Self {
            player: InMemoryCache::for_namespace(CacheNamespace::Player, ttl),
            stats: InMemoryCache::for_namespace(CacheNamespace::Stats, ttl),
            market: InMemoryCache::for_namespace(CacheNamespace::Market, ttl),
            league: InMemoryCache::for_namespace(CacheNamespace::League, ttl),
            search: InMemoryCache::for_namespace(CacheNamespace::Search, ttl),
            cleanup: Mutex::new(None),
        }
    }

    /// Store backing a namespace
    #[must_use]
    pub const fn namespace(&self, namespace: CacheNamespace) -> &InMemoryCache {
        match namespace {
            CacheNamespace::Player => &self.player,
            CacheNamespace::Stats => &self.stats,
            CacheNamespace::Market => &self.market,
            CacheNamespace::League => &self.league,
            CacheNamespace::Search => &self.search,
        }
    }

    // Key derivation

    /// Key of a player profile
    #[must_use]
    pub fn player_key(player_id: u64) -> String {
        make_key(CacheNamespace::Player.prefix(), &[&player_id.to_string()])
    }

    /// Key of a player's statistics for one season
    #[must_use]
    pub fn stats_key(player_id: u64, season: &str) -> String {
        make_key(
            CacheNamespace::Stats.prefix(),
            &[&player_id.to_string(), season],
        )
    }

    /// Key of a market listing
    #[must_use]
    pub fn market_key(position: &str, league: &str) -> String {
        make_key(CacheNamespace::Market.prefix(), &[position, league])
    }

    /// Key of a search result set
    #[must_use]
    pub fn search_key(query_hash: &str) -> String {
        make_key(CacheNamespace::Search.prefix(), &[query_hash])
    }

    /// Stable digest of a free-text query
    ///
    /// Case and surrounding or repeated whitespace are ignored, so
    /// `"  Young  Strikers"` and `"young strikers"` share one cache entry.
    #[must_use]
    pub fn query_hash(query: &str) -> String {
        let normalized = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        hex::encode(Sha256::digest(normalized.as_bytes()))
    }

    fn player_tag(player_id: u64) -> String {
        format!("{PLAYER_TAG_PREFIX}{player_id}")
    }

    // Player profiles

    /// Cached player profile
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the cached value does not match `T`
    pub fn get_player_profile<T: DeserializeOwned>(&self, player_id: u64) -> AppResult<Option<T>> {
        self.player.get(&Self::player_key(player_id))
    }

    /// Cache a player profile
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `profile` cannot be converted to JSON
    pub fn set_player_profile<T: Serialize + ?Sized>(
        &self,
        player_id: u64,
        profile: &T,
    ) -> AppResult<()> {
        self.player.set(&Self::player_key(player_id), profile)
    }

    // Season statistics

    /// Cached season statistics for a player
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the cached value does not match `T`
    pub fn get_player_stats<T: DeserializeOwned>(
        &self,
        player_id: u64,
        season: &str,
    ) -> AppResult<Option<T>> {
        self.stats.get(&Self::stats_key(player_id, season))
    }

    /// Cache season statistics, tagged with the player so they can be invalidated together
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `stats` cannot be converted to JSON
    pub fn set_player_stats<T: Serialize + ?Sized>(
        &self,
        player_id: u64,
        season: &str,
        stats: &T,
    ) -> AppResult<()> {
        self.stats.set_tagged(
            &Self::stats_key(player_id, season),
            stats,
            self.stats.default_ttl(),
            &Self::player_tag(player_id),
        )
    }

    // Market listings

    /// Cached market listing
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the cached value does not match `T`
    pub fn get_market_data<T: DeserializeOwned>(
        &self,
        position: &str,
        league: &str,
    ) -> AppResult<Option<T>> {
        self.market.get(&Self::market_key(position, league))
    }

    /// Cache a market listing
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `listing` cannot be converted to JSON
    pub fn set_market_data<T: Serialize + ?Sized>(
        &self,
        position: &str,
        league: &str,
        listing: &T,
    ) -> AppResult<()> {
        self.market.set(&Self::market_key(position, league), listing)
    }

    // Leagues

    /// Cached league catalogue
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the cached value does not match `T`
    pub fn get_leagues<T: DeserializeOwned>(&self) -> AppResult<Option<T>> {
        self.league.get(LEAGUES_ALL_KEY)
    }

    /// Cache the league catalogue
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `leagues` cannot be converted to JSON
    pub fn set_leagues<T: Serialize + ?Sized>(&self, leagues: &T) -> AppResult<()> {
        self.league.set(LEAGUES_ALL_KEY, leagues)
    }

    // Search results

    /// Cached search results for a query digest
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the cached value does not match `T`
    pub fn get_search_results<T: DeserializeOwned>(&self, query_hash: &str) -> AppResult<Option<T>> {
        self.search.get(&Self::search_key(query_hash))
    }

    /// Cache search results under a query digest
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `results` cannot be converted to JSON
    pub fn set_search_results<T: Serialize + ?Sized>(
        &self,
        query_hash: &str,
        results: &T,
    ) -> AppResult<()> {
        self.search.set(&Self::search_key(query_hash), results)
    }

    // Maintenance

    /// Drop a player's profile and every season statistics entry cached for them
    ///
    /// Market listings and search results are keyed by filters rather than by
    /// player and are left to expire on their own. Returns the number of
    /// entries removed.
    pub fn invalidate_player(&self, player_id: u64) -> usize {
        let profile = usize::from(self.player.delete(&Self::player_key(player_id)));
        let stats = self.stats.delete_tagged(&Self::player_tag(player_id));
        debug!(player_id, profile, stats, "Invalidated cached player data");
        profile + stats
    }

    /// Sweep expired entries from every namespace, returning the total evicted
    pub fn sweep_all(&self) -> usize {
        CacheNamespace::ALL
            .iter()
            .map(|ns| self.namespace(*ns).sweep())
            .sum()
    }

    /// Drop every entry in every namespace, returning the total removed
    pub fn clear_all(&self) -> usize {
        CacheNamespace::ALL
            .iter()
            .map(|ns| self.namespace(*ns).clear())
            .sum()
    }

    /// Statistics for every namespace plus totals
    #[must_use]
    pub fn get_all_stats(&self) -> SmartCacheStats {
        SmartCacheStats::from_namespaces(
            self.player.get_stats(),
            self.stats.get_stats(),
            self.market.get_stats(),
            self.league.get_stats(),
            self.search.get_stats(),
        )
    }

    // Background cleanup

    fn lock_cleanup(&self) -> MutexGuard<'_, Option<CleanupTask>> {
        self.cleanup.lock().unwrap_or_else(|poisoned| {
            warn!("Cache cleanup lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Spawn a task that sweeps all namespaces every `period`
    ///
    /// Must be called from within a tokio runtime. The task only holds a weak
    /// reference and exits once the cache is dropped or
    /// [`stop_background_cleanup`](Self::stop_background_cleanup) is called.
    /// Returns `false` if a cleanup task is already running.
    pub fn start_background_cleanup(self: &Arc<Self>, period: Duration) -> bool {
        let mut slot = self.lock_cleanup();
        if slot.is_some() {
            return false;
        }

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = period.max(Duration::from_millis(1));
        // Anchored at the call, not at the task's first poll
        let first_tick = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(cache) = cache.upgrade() else {
                            break;
                        };
                        let evicted = cache.sweep_all();
                        if evicted > 0 {
                            debug!(evicted, "Background sweep removed expired cache entries");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Cache cleanup task received shutdown signal");
                        break;
                    }
                }
            }
        });

        *slot = Some(CleanupTask {
            shutdown_tx,
            handle,
        });
        drop(slot);
        info!(interval_secs = period.as_secs_f64(), "Started background cache cleanup");
        true
    }

    /// Whether a background cleanup task is running
    #[must_use]
    pub fn is_background_cleanup_running(&self) -> bool {
        self.lock_cleanup()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Stop the background cleanup task and wait for it to exit
    pub async fn stop_background_cleanup(&self) {
        let task = self.lock_cleanup().take();
        if let Some(task) = task {
            // A full channel or an exited task both mean it is already stopping
            let _ = task.shutdown_tx.try_send(());
            if let Err(e) = task.handle.await {
                warn!(error = %e, "Cache cleanup task ended abnormally");
            }
            info!("Stopped background cache cleanup");
        }
    }
}

impl Drop for SmartCache {
    fn drop(&mut self) {
        if let Some(task) = self.lock_cleanup().take() {
            task.handle.abort();
        }
    }
}

/// Statistics for every namespace plus totals
#[derive(Debug, Clone, Serialize)]
pub struct SmartCacheStats {
    /// Player profiles
    pub player: CacheStats,
    /// Season statistics
    pub stats: CacheStats,
    /// Market listings
    pub market: CacheStats,
    /// League catalogue
    pub league: CacheStats,
    /// Search results
    pub search: CacheStats,
    /// Entries across all namespaces
    pub total_entries: usize,
    /// Hits across all namespaces
    pub total_hits: u64,
    /// Misses across all namespaces
    pub total_misses: u64,
    /// `total_hits / max(total_hits + total_misses, 1)`
    pub overall_hit_rate: f64,
}

impl SmartCacheStats {
    fn from_namespaces(
        player: CacheStats,
        stats: CacheStats,
        market: CacheStats,
        league: CacheStats,
        search: CacheStats,
    ) -> Self {
        let all = [player, stats, market, league, search];
        let total_hits: u64 = all.iter().map(|s| s.hits).sum();
        let total_misses: u64 = all.iter().map(|s| s.misses).sum();
        Self {
            total_entries: all.iter().map(|s| s.total_entries).sum(),
            total_hits,
            total_misses,
            overall_hit_rate: total_hits as f64 / (total_hits + total_misses).max(1) as f64,
            player,
            stats,
            market,
            league,
            search,
        }
    }

    /// Statistics of one namespace
    #[must_use]
    pub const fn get(&self, namespace: CacheNamespace) -> &CacheStats {
        match namespace {
            CacheNamespace::Player => &self.player,
            CacheNamespace::Stats => &self.stats,
            CacheNamespace::Market => &self.market,
            CacheNamespace::League => &self.league,
            CacheNamespace::Search => &self.search,
        }
    }
}
