// ABOUTME: Route module organization for the scouting server HTTP endpoints
// ABOUTME: Health, system observability and player data routes merged into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! HTTP routes
//!
//! Each domain module holds route definitions and thin handlers that delegate
//! to [`ServerResources`].

/// Player and league data routes
pub mod data;
/// Liveness and system observability routes
pub mod health;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::resources::ServerResources;

pub use data::DataRoutes;
pub use health::HealthRoutes;

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(DataRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
}
