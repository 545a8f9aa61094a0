// ABOUTME: Main library entry point for the soccer scouting data access layer
// ABOUTME: Namespaced TTL cache, resilient Sportmonks access, configuration and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

#![deny(unsafe_code)]

//! # Soccer Scout
//!
//! Backend data layer for a football scouting service. Upstream data comes
//! from the Sportmonks football API, which is rate limited and occasionally
//! unavailable, so every read goes through two layers:
//!
//! - **Cache**: [`cache::SmartCache`], five namespaced TTL stores (player,
//!   stats, market, league, search) with hit/miss telemetry.
//! - **Resilient client**: [`providers::ResilientHttpClient`], bounded
//!   retries with jittered exponential backoff, `Retry-After` aware sleeps
//!   and a consecutive-failure circuit breaker.
//!
//! [`external::SportmonksClient`] combines the two, and
//! [`resources::ServerResources`] wires everything together for the
//! `scout-server` binary.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use soccer_scout::config::environment::ServerConfig;
//! use soccer_scout::errors::AppResult;
//! use soccer_scout::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = ServerResources::new(config)?;
//!
//!     let leagues = resources.sportmonks.get_leagues_or_fallback().await;
//!     println!("{leagues}");
//!
//!     resources.shutdown().await;
//!     Ok(())
//! }
//! ```

/// Namespaced in-memory TTL cache
pub mod cache;

/// Environment configuration
pub mod config;

/// External data provider clients
pub mod external;

/// Structured logging setup
pub mod logging;

/// Composition root shared by request handlers
pub mod resources;

/// HTTP routes
pub mod routes;

/// Application constants (re-exported from scout-core)
pub use scout_core::constants;

/// Error types (re-exported from scout-core)
pub use scout_core::errors;

/// Resilient upstream access (re-exported from scout-providers)
pub use scout_providers as providers;
