// ABOUTME: Sportmonks football API client with cache-first reads over the resilient HTTP client
// ABOUTME: Normalizes provider payloads, writes them back with namespace TTLs and offers degraded fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! Sportmonks Football API client
//!
//! Every read follows the same path: probe the namespace in [`SmartCache`];
//! on a miss call the API through [`ResilientHttpClient`]; unwrap the
//! provider's `data` envelope, stamp it and cache it with the namespace TTL.
//!
//! The `*_or_fallback` variants never fail. When the upstream call ultimately
//! fails they return a placeholder marked `"degraded": true`, which is never
//! written to the cache.
//!
//! # API Reference
//! Sportmonks Football API v3: <https://docs.sportmonks.com/football>

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::SmartCache;
use crate::config::environment::SportmonksConfig;
use crate::constants::service_names::SPORTMONKS;
use crate::constants::sportmonks::{PLAYER_PROFILE_INCLUDES, SEASON_STATS_INCLUDES};
use crate::errors::{AppError, AppResult};
use crate::providers::{ProviderError, RequestOptions, ResilientHttpClient};

/// Leagues served when the catalogue cannot be fetched
const FALLBACK_LEAGUES: [(u64, &str, &str); 5] = [
    (8, "Premier League", "England"),
    (564, "La Liga", "Spain"),
    (384, "Serie A", "Italy"),
    (82, "Bundesliga", "Germany"),
    (301, "Ligue 1", "France"),
];

/// Cache-first client for the Sportmonks football API
pub struct SportmonksClient {
    config: SportmonksConfig,
    http: Arc<ResilientHttpClient>,
    cache: Arc<SmartCache>,
}

impl SportmonksClient {
    /// Create a client sharing the given HTTP client and cache
    #[must_use]
    pub const fn new(
        config: SportmonksConfig,
        http: Arc<ResilientHttpClient>,
        cache: Arc<SmartCache>,
    ) -> Self {
        Self {
            config,
            http,
            cache,
        }
    }

    /// Base URL requests are issued against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Cache shared with this client
    #[must_use]
    pub const fn cache(&self) -> &Arc<SmartCache> {
        &self.cache
    }

    fn request_options(&self) -> RequestOptions {
        let options = RequestOptions::new().header("Accept", "application/json");
        match &self.config.api_key {
            Some(key) => options.header("Authorization", format!("Bearer {key}")),
            None => options,
        }
    }

    async fn fetch(&self, path: &str, options: RequestOptions) -> AppResult<Value> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        debug!(provider = SPORTMONKS, url = %url, "Fetching from Sportmonks");

        let response = self.http.get(&url, &options).await?;
        let body: Value = response.json(SPORTMONKS)?;
        Ok(unwrap_data(body))
    }

    /// Full player profile
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call ultimately fails or the cached value is unreadable
    pub async fn get_player_profile(&self, player_id: u64) -> AppResult<Value> {
        if let Some(cached) = self.cache.get_player_profile::<Value>(player_id)? {
            debug!(player_id, "Player profile served from cache");
            return Ok(cached);
        }

        let options = self
            .request_options()
            .query("include", PLAYER_PROFILE_INCLUDES);
        let player = self.fetch(&format!("players/{player_id}"), options).await?;
        let profile = stamp(player);

        self.cache.set_player_profile(player_id, &profile)?;
        Ok(profile)
    }

    /// Player statistics for one season
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call ultimately fails or the cached value is unreadable
    pub async fn get_player_season_statistics(
        &self,
        player_id: u64,
        season_id: u32,
    ) -> AppResult<Value> {
        let season = season_id.to_string();
        if let Some(cached) = self.cache.get_player_stats::<Value>(player_id, &season)? {
            debug!(player_id, season_id, "Season statistics served from cache");
            return Ok(cached);
        }

        let options = self.request_options().query("include", SEASON_STATS_INCLUDES);
        let entries = self
            .fetch(
                &format!("players/{player_id}/statistics/seasons/{season_id}"),
                options,
            )
            .await?;
        let stats = stamp(json!({
            "player_id": player_id,
            "season_id": season_id,
            "statistics": entries,
        }));

        self.cache.set_player_stats(player_id, &season, &stats)?;
        Ok(stats)
    }

    /// League catalogue
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream call ultimately fails or the cached value is unreadable
    pub async fn get_leagues(&self) -> AppResult<Value> {
        if let Some(cached) = self.cache.get_leagues::<Value>()? {
            debug!("League catalogue served from cache");
            return Ok(cached);
        }

        let leagues = self.fetch("leagues", self.request_options()).await?;
        self.cache.set_leagues(&leagues)?;
        Ok(leagues)
    }

    /// Players listed for a position within a league
    ///
    /// # Errors
    ///
    /// Returns an error for an empty position, or if the upstream call ultimately fails
    pub async fn get_market_listing(&self, position: &str, league: &str) -> AppResult<Value> {
        let position = position.trim();
        let league = league.trim();
        if position.is_empty() {
            return Err(AppError::invalid_input("position must not be empty"));
        }

        if let Some(cached) = self.cache.get_market_data::<Value>(position, league)? {
            debug!(position, league, "Market listing served from cache");
            return Ok(cached);
        }

        let mut options = self.request_options().query("position", position);
        if !league.is_empty() {
            options = options.query("league", league);
        }
        let players = self.fetch("players/search", options).await?;
        let listing = stamp(json!({
            "position": position,
            "league": league,
            "players": players,
        }));

        self.cache.set_market_data(position, league, &listing)?;
        Ok(listing)
    }

    /// Players whose name matches a free-text query
    ///
    /// Queries differing only in case or whitespace share one cache entry.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank query, or if the upstream call ultimately fails
    pub async fn search_players(&self, query: &str) -> AppResult<Value> {
        let normalized = query.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(AppError::invalid_input("search query must not be empty"));
        }

        let query_hash = SmartCache::query_hash(&normalized);
        if let Some(cached) = self.cache.get_search_results::<Value>(&query_hash)? {
            debug!(query = %normalized, "Search results served from cache");
            return Ok(cached);
        }

        let players = self
            .fetch(
                &format!("players/search/{}", urlencoding::encode(&normalized)),
                self.request_options(),
            )
            .await?;
        self.cache.set_search_results(&query_hash, &players)?;
        Ok(players)
    }

    /// Player profile, or a degraded placeholder when the upstream is failing
    pub async fn get_player_profile_or_fallback(&self, player_id: u64) -> Value {
        match self.get_player_profile(player_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(player_id, error = %e, "Serving degraded player profile");
                Self::fallback_profile(player_id)
            }
        }
    }

    /// League catalogue, or a static degraded list when the upstream is failing
    pub async fn get_leagues_or_fallback(&self) -> Value {
        match self.get_leagues().await {
            Ok(leagues) => leagues,
            Err(e) => {
                warn!(error = %e, "Serving degraded league catalogue");
                Self::fallback_leagues()
            }
        }
    }

    /// Placeholder profile returned when the provider is unavailable
    #[must_use]
    pub fn fallback_profile(player_id: u64) -> Value {
        json!({
            "id": player_id,
            "degraded": true,
            "source": "fallback",
            "message": "Player data is temporarily unavailable",
        })
    }

    /// Static league list returned when the provider is unavailable
    #[must_use]
    pub fn fallback_leagues() -> Value {
        FALLBACK_LEAGUES
            .iter()
            .map(|(id, name, country)| {
                json!({
                    "id": id,
                    "name": name,
                    "country": country,
                    "degraded": true,
                })
            })
            .collect()
    }

    /// Preload the league catalogue and the given player profiles
    ///
    /// Returns how many entries were fetched or already warm. Failures are
    /// logged and skipped; an open circuit stops the remaining work.
    pub async fn warm_popular_caches(&self, player_ids: &[u64]) -> usize {
        info!(players = player_ids.len(), "Warming popular caches");
        let mut warmed = 0;

        match self.get_leagues().await {
            Ok(_) => warmed += 1,
            Err(e) => {
                warn!(error = %e, "Failed to warm league catalogue");
                if is_circuit_open(&e) {
                    return warmed;
                }
            }
        }

        for &player_id in player_ids {
            match self.get_player_profile(player_id).await {
                Ok(_) => warmed += 1,
                Err(e) => {
                    warn!(player_id, error = %e, "Failed to warm player profile");
                    if is_circuit_open(&e) {
                        break;
                    }
                }
            }
        }

        info!(warmed, "Cache warming finished");
        warmed
    }
}

fn is_circuit_open(error: &AppError) -> bool {
    matches!(
        error.provider_error(),
        Some(ProviderError::CircuitBreakerOpen { .. })
    )
}

/// Strip the provider's `{"data": ...}` envelope if present
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Object(map)),
        other => other,
    }
}

/// Tag an object payload with its source and fetch time
fn stamp(payload: Value) -> Value {
    let mut map = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_owned(), other);
            map
        }
    };
    map.insert("source".to_owned(), json!(SPORTMONKS));
    map.insert("fetched_at".to_owned(), json!(Utc::now().to_rfc3339()));
    Value::Object(map)
}
