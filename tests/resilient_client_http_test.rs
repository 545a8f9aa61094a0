// ABOUTME: End-to-end tests of the resilient client over real HTTP against a mock server
// ABOUTME: Verifies headers, query parameters, Retry-After handling and timeouts through reqwest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors
#![allow(missing_docs)]
#![allow(clippy::panic)]

mod common;

use anyhow::Result;
use common::init_test_logging;
use soccer_scout::providers::{
    ProviderError, RequestOptions, ResilientClientConfig, ResilientHttpClient,
};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_config() -> ResilientClientConfig {
    ResilientClientConfig {
        default_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        max_retries: 2,
        backoff_base: Duration::from_millis(10),
        backoff_cap: Duration::from_millis(50),
        circuit_breaker_threshold: 3,
        circuit_reset_timeout: Duration::from_secs(60),
    }
}

#[tokio::test]
async fn test_forwards_headers_and_query() -> Result<()> {
    init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/players/42"))
        .and(header("Authorization", "Bearer secret"))
        .and(query_param("include", "position"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"id":42}}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResilientHttpClient::new("sportmonks", quick_config())?;
    let options = RequestOptions::new()
        .header("Authorization", "Bearer secret")
        .query("include", "position");

    let response = client
        .get(&format!("{}/players/42", mock_server.uri()), &options)
        .await?;
    let body: serde_json::Value = response.json("sportmonks")?;
    assert_eq!(body["data"]["id"], 42);

    Ok(())
}

#[tokio::test]
async fn test_recovers_after_transient_server_errors() -> Result<()> {
    init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/leagues"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResilientHttpClient::new("sportmonks", quick_config())?;
    let response = client
        .get(&format!("{}/leagues", mock_server.uri()), &RequestOptions::new())
        .await?;

    assert_eq!(response.status(), 200);
    assert_eq!(client.telemetry().total_attempts, 3);
    assert_eq!(client.circuit_breaker().failure_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_reads_retry_after_header() -> Result<()> {
    init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0.05"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = ResilientHttpClient::new("sportmonks", quick_config())?;
    let err = client
        .get(&format!("{}/players/search/kane", mock_server.uri()), &RequestOptions::new())
        .await
        .err();

    match err {
        Some(ProviderError::RateLimitExceeded {
            retry_after_secs,
            attempts,
            ..
        }) => {
            assert_eq!(retry_after_secs, Some(1));
            assert_eq!(attempts, 3);
        }
        other => panic!("expected RateLimitExceeded, got {other:?}"),
    }
    assert_eq!(client.telemetry().rate_limits, 3);
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_fatal() -> Result<()> {
    init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"No result"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResilientHttpClient::new("sportmonks", quick_config())?;
    let err = client
        .get(&format!("{}/players/0", mock_server.uri()), &RequestOptions::new())
        .await
        .err();

    assert_eq!(err.and_then(|e| e.status_code()), Some(404));
    Ok(())
}

#[tokio::test]
async fn test_slow_response_times_out() -> Result<()> {
    init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let mut config = quick_config();
    config.max_retries = 0;
    let client = ResilientHttpClient::new("sportmonks", config)?;
    let options = RequestOptions::new().timeout(Duration::from_millis(50));

    let err = client
        .get(&format!("{}/players/1", mock_server.uri()), &options)
        .await
        .err();

    assert!(
        matches!(err, Some(ProviderError::NetworkError { timed_out: true, .. })),
        "expected a timeout, got {err:?}"
    );
    Ok(())
}
