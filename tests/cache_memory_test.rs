// ABOUTME: Expiry, eviction accounting and isolation tests for the single-namespace TTL cache
// ABOUTME: Uses tokio's paused clock so deadlines are hit exactly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde::{Deserialize, Serialize};
use serde_json::json;
use soccer_scout::cache::{CacheNamespace, CacheTtlConfig, InMemoryCache};
use soccer_scout::errors::ErrorCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::time::advance;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Player {
    id: u64,
    name: String,
}

fn player(id: u64, name: &str) -> Player {
    Player {
        id,
        name: name.to_owned(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_value_is_served_until_ttl_then_missing() {
    let cache = InMemoryCache::new("player", Duration::from_secs(60));
    cache.set("p:1", &player(1, "Saka")).unwrap();

    advance(Duration::from_secs(59)).await;
    assert_eq!(cache.get::<Player>("p:1").unwrap(), Some(player(1, "Saka")));

    advance(Duration::from_secs(2)).await;
    assert_eq!(cache.get::<Player>("p:1").unwrap(), None);

    let stats = cache.get_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.total_entries, 0);
}

#[tokio::test(start_paused = true)]
async fn test_entry_is_live_exactly_at_deadline() {
    let cache = InMemoryCache::new("player", Duration::from_secs(10));
    cache.set("k", &1).unwrap();

    advance(Duration::from_secs(10)).await;
    assert_eq!(cache.remaining_ttl("k"), Some(Duration::ZERO));
    assert_eq!(cache.get::<i32>("k").unwrap(), Some(1));

    advance(Duration::from_millis(1)).await;
    assert_eq!(cache.get::<i32>("k").unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_read_sweeps_every_expired_entry() {
    let cache = InMemoryCache::new("market", Duration::from_secs(300));
    cache.set_with_ttl("short-a", &"a", Duration::from_secs(5)).unwrap();
    cache.set_with_ttl("short-b", &"b", Duration::from_secs(5)).unwrap();
    cache.set("long", &"c").unwrap();

    advance(Duration::from_secs(6)).await;
    // Expired entries linger until something sweeps
    assert_eq!(cache.len(), 3);

    // A lookup for an unrelated key still sweeps both expired entries
    assert_eq!(cache.get::<String>("long").unwrap().as_deref(), Some("c"));
    assert_eq!(cache.len(), 1);

    let stats = cache.get_stats();
    assert_eq!(stats.evictions, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 0);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_sweep_counts_evictions() {
    let cache = InMemoryCache::new("search", Duration::from_secs(1));
    for i in 0..4 {
        cache.set(&format!("q{i}"), &i).unwrap();
    }

    advance(Duration::from_secs(2)).await;
    assert_eq!(cache.sweep(), 4);
    assert_eq!(cache.sweep(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.get_stats().evictions, 4);
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_replaces_value_and_deadline() {
    let cache = InMemoryCache::new("player", Duration::from_secs(30));
    cache.set("k", &player(7, "Pedri")).unwrap();

    advance(Duration::from_secs(20)).await;
    cache.set("k", &player(7, "Pedri González")).unwrap();
    assert_eq!(cache.age("k"), Some(Duration::ZERO));

    advance(Duration::from_secs(20)).await;
    // Forty seconds after the first write, but only twenty after the overwrite
    assert_eq!(
        cache.get::<Player>("k").unwrap(),
        Some(player(7, "Pedri González"))
    );

    let stats = cache.get_stats();
    assert_eq!(stats.sets, 2);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.total_entries, 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_ttl_entry_lives_only_for_the_current_instant() {
    let cache = InMemoryCache::new("player", Duration::from_secs(30));
    cache.set_with_ttl("k", &1, Duration::ZERO).unwrap();
    assert!(cache.contains("k"));

    advance(Duration::from_millis(1)).await;
    assert!(!cache.contains("k"));
}

#[tokio::test(start_paused = true)]
async fn test_huge_ttl_does_not_overflow() {
    let cache = InMemoryCache::new("league", Duration::from_secs(60));
    cache.set_with_ttl("k", &1, Duration::MAX).unwrap();

    advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
    assert_eq!(cache.get::<i32>("k").unwrap(), Some(1));
}

#[test]
fn test_inspection_does_not_touch_counters() {
    let cache = InMemoryCache::new("player", Duration::from_secs(60));
    cache.set("k", &1).unwrap();

    assert!(cache.contains("k"));
    assert!(!cache.contains("missing"));
    assert!(cache.remaining_ttl("k").is_some());
    assert!(cache.age("k").is_some());

    let stats = cache.get_stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_delete_and_clear() {
    let cache = InMemoryCache::new("player", Duration::from_secs(60));
    cache.set("a", &1).unwrap();
    cache.set("b", &2).unwrap();

    assert!(cache.delete("a"));
    assert!(!cache.delete("a"));
    assert_eq!(cache.clear(), 1);
    assert!(cache.is_empty());

    // Counters survive a clear
    assert_eq!(cache.get_stats().sets, 2);
}

#[test]
fn test_delete_tagged_removes_only_matching_entries() {
    let cache = InMemoryCache::new("stats", Duration::from_secs(60));
    let ttl = cache.default_ttl();
    cache.set_tagged("s1", &1, ttl, "player:1").unwrap();
    cache.set_tagged("s2", &2, ttl, "player:1").unwrap();
    cache.set_tagged("s3", &3, ttl, "player:2").unwrap();
    cache.set("s4", &4).unwrap();

    assert_eq!(cache.delete_tagged("player:1"), 2);
    assert_eq!(cache.len(), 2);
    assert!(cache.contains("s3"));
    assert!(cache.contains("s4"));
}

#[test]
fn test_shape_mismatch_is_a_serialization_error() {
    let cache = InMemoryCache::new("player", Duration::from_secs(60));
    cache.set_value("k", json!({"unexpected": true}), Duration::from_secs(60));

    let err = cache.get::<Player>("k").unwrap_err();
    assert_eq!(err.code, ErrorCode::SerializationError);
    // The raw value is still there for callers that want it
    assert_eq!(cache.get_value("k"), Some(json!({"unexpected": true})));
}

#[test]
fn test_hit_rate() {
    let cache = InMemoryCache::new("player", Duration::from_secs(60));
    assert!(cache.get_stats().hit_rate.abs() < f64::EPSILON);

    cache.set("k", &1).unwrap();
    for _ in 0..3 {
        cache.get_value("k");
    }
    cache.get_value("missing");

    let stats = cache.get_stats();
    assert_eq!(stats.total_requests, 4);
    assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
}

#[test]
fn test_namespace_defaults_come_from_ttl_config() {
    let ttl = CacheTtlConfig::default();
    let players = InMemoryCache::for_namespace(CacheNamespace::Player, &ttl);
    let leagues = InMemoryCache::for_namespace(CacheNamespace::League, &ttl);

    assert_eq!(players.name(), "player");
    assert_eq!(players.default_ttl(), Duration::from_secs(1_800));
    assert_eq!(leagues.default_ttl(), Duration::from_secs(86_400));
}

#[test]
fn test_concurrent_writers_and_readers() {
    let cache = Arc::new(InMemoryCache::new("search", Duration::from_secs(60)));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("{t}:{i}");
                    cache.set(&key, &i).unwrap();
                    assert_eq!(cache.get::<i32>(&key).unwrap(), Some(i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.get_stats();
    assert_eq!(stats.total_entries, 800);
    assert_eq!(stats.sets, 800);
    assert_eq!(stats.hits, 800);
}
