// ABOUTME: Cache-first behaviour of the Sportmonks client against a mock API
// ABOUTME: Covers auth headers, envelope unwrapping, query normalization, fallbacks and warming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use anyhow::Result;
use common::{leagues_body, player_body, test_resources};
use serde_json::{json, Value};
use soccer_scout::constants::sportmonks::{PLAYER_PROFILE_INCLUDES, SEASON_STATS_INCLUDES};
use soccer_scout::errors::ErrorCode;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_player_profile_is_fetched_once_then_cached() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players/278"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Accept", "application/json"))
        .and(query_param("include", PLAYER_PROFILE_INCLUDES))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(278, "Bukayo Saka")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let first = resources.sportmonks.get_player_profile(278).await?;
    let second = resources.sportmonks.get_player_profile(278).await?;

    assert_eq!(first["display_name"], "Bukayo Saka");
    assert_eq!(first["source"], "sportmonks");
    assert!(first["fetched_at"].is_string());
    assert!(first.get("data").is_none(), "envelope should be unwrapped");
    assert_eq!(first, second);

    let stats = resources.cache.get_all_stats();
    assert_eq!(stats.player.hits, 1);
    assert_eq!(stats.player.misses, 1);
    Ok(())
}

#[tokio::test]
async fn test_season_statistics_are_cached_per_season() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/players/278/statistics/seasons/\d+$"))
        .and(query_param("include", SEASON_STATS_INCLUDES))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"type_id": 52, "value": 14}]})),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let client = &resources.sportmonks;

    let stats = client.get_player_season_statistics(278, 23614).await?;
    assert_eq!(stats["player_id"], 278);
    assert_eq!(stats["season_id"], 23614);
    assert_eq!(stats["statistics"][0]["value"], 14);

    client.get_player_season_statistics(278, 23614).await?;
    client.get_player_season_statistics(278, 21646).await?;

    // Invalidating the player forces both seasons to be refetched
    assert_eq!(resources.cache.invalidate_player(278), 2);
    Ok(())
}

#[tokio::test]
async fn test_leagues_are_unwrapped_and_cached() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leagues_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let leagues = resources.sportmonks.get_leagues().await?;
    assert_eq!(leagues.as_array().map(Vec::len), Some(2));

    let cached = resources.sportmonks.get_leagues_or_fallback().await;
    assert_eq!(cached, leagues);
    Ok(())
}

#[tokio::test]
async fn test_search_queries_share_entry_after_normalization() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/players/search/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 9}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let client = &resources.sportmonks;

    let first = client.search_players("Young  Strikers").await?;
    let second = client.search_players("  young strikers ").await?;
    assert_eq!(first, json!([{"id": 9}]));
    assert_eq!(first, second);

    let err = client.search_players("   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_market_listing_passes_filters() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players/search"))
        .and(query_param("position", "striker"))
        .and(query_param("league", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let client = &resources.sportmonks;

    let listing = client.get_market_listing("striker", "8").await?;
    assert_eq!(listing["position"], "striker");
    assert_eq!(listing["players"], json!([{"id": 1}]));
    client.get_market_listing(" striker ", " 8 ").await?;

    let err = client.get_market_listing("", "8").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    Ok(())
}

#[tokio::test]
async fn test_upstream_not_found_maps_to_resource_not_found() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let err = resources.sportmonks.get_player_profile(1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_fallback_profile_is_degraded_and_not_cached() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let profile = resources.sportmonks.get_player_profile_or_fallback(5).await;

    assert_eq!(profile["id"], 5);
    assert_eq!(profile["degraded"], true);
    assert!(resources.cache.get_player_profile::<Value>(5)?.is_none());

    let leagues = resources.sportmonks.get_leagues_or_fallback().await;
    assert!(leagues
        .as_array()
        .unwrap()
        .iter()
        .all(|league| league["degraded"] == true));
    assert!(resources.cache.get_leagues::<Value>()?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_warming_populates_cache() -> Result<()> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leagues_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/players/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(1, "Player")))
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let warmed = resources.sportmonks.warm_popular_caches(&[1, 2, 3]).await;

    assert_eq!(warmed, 4);
    assert_eq!(resources.cache.get_all_stats().total_entries, 4);
    Ok(())
}

#[tokio::test]
async fn test_warming_stops_once_circuit_opens() -> Result<()> {
    let mock_server = MockServer::start().await;
    // Threshold 3 with one retry each: leagues, player 1 and player 2 reach the network
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(6)
        .mount(&mock_server)
        .await;

    let resources = test_resources(&mock_server.uri());
    let warmed = resources
        .sportmonks
        .warm_popular_caches(&[1, 2, 3, 4, 5])
        .await;

    assert_eq!(warmed, 0);
    assert!(resources.http_telemetry().circuit_open);
    Ok(())
}
