// ABOUTME: Player and league data route handlers backed by the cache-first Sportmonks client
// ABOUTME: Upstream outages degrade to placeholder payloads instead of failing the request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::errors::{AppError, ErrorCode};
use crate::external::SportmonksClient;
use crate::resources::ServerResources;

/// Data routes
pub struct DataRoutes;

impl DataRoutes {
    /// Create all data routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/leagues", get(Self::handle_leagues))
            .route("/api/player/:player_id", get(Self::handle_player))
            .with_state(resources)
    }

    async fn handle_leagues(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let leagues = resources.sportmonks.get_leagues_or_fallback().await;
        Json(json!({ "leagues": leagues }))
    }

    /// A player the provider does not know is a 404; any other failure degrades
    async fn handle_player(
        State(resources): State<Arc<ServerResources>>,
        Path(player_id): Path<u64>,
    ) -> Result<Json<Value>, AppError> {
        match resources.sportmonks.get_player_profile(player_id).await {
            Ok(player) => Ok(Json(json!({ "player": player }))),
            Err(e) if e.code == ErrorCode::ResourceNotFound => {
                Err(AppError::not_found(format!("Player {player_id}")))
            }
            Err(e) => {
                warn!(player_id, error = %e, "Serving degraded player profile");
                Ok(Json(json!({
                    "player": SportmonksClient::fallback_profile(player_id)
                })))
            }
        }
    }
}
