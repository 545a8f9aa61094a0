// ABOUTME: Health check and system observability route handlers
// ABOUTME: Liveness, cache statistics and HTTP client telemetry endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::cache::SmartCacheStats;
use crate::resources::ServerResources;

/// Health and system routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health and system routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/api/system/cache-stats", get(Self::handle_cache_stats))
            .route("/api/system/health", get(Self::handle_system_health))
            .with_state(resources)
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({ "status": "healthy" }))
    }

    async fn handle_cache_stats(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<SmartCacheStats> {
        Json(resources.cache.get_all_stats())
    }

    /// Overall status is `degraded` while the upstream circuit is open
    async fn handle_system_health(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let telemetry = resources.http_telemetry();
        let status = if telemetry.circuit_open {
            "degraded"
        } else {
            "healthy"
        };

        Json(json!({
            "status": status,
            "timestamp": Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
            "cache": resources.cache.get_all_stats(),
            "http_client": telemetry,
        }))
    }
}
