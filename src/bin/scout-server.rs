// ABOUTME: Scouting API server binary wiring configuration, logging, resources and routes
// ABOUTME: Serves health, cache statistics and player data over HTTP with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Soccer Scout Contributors

//! # Soccer Scout Server Binary
//!
//! Loads configuration from the environment, builds the shared resources and
//! serves the HTTP API until interrupted.

use anyhow::Result;
use clap::Parser;
use soccer_scout::{
    config::environment::ServerConfig, logging, resources::ServerResources, routes,
};
use std::future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "scout-server")]
#[command(about = "Soccer scouting API backed by a resilient Sportmonks data layer")]
struct Args {
    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Player IDs to preload when cache warming is enabled
    #[arg(long, value_delimiter = ',')]
    warm_players: Vec<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    info!("{}", config.summary());

    let bind_address = config.bind_address();
    let warm_on_startup = config.warm_cache_on_startup;
    let resources = Arc::new(ServerResources::new(config)?);

    if warm_on_startup {
        let warmer = Arc::clone(&resources);
        let players = args.warm_players;
        tokio::spawn(async move {
            warmer.sportmonks.warm_popular_caches(&players).await;
        });
    }

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server listening on {bind_address}");

    let app = routes::router(Arc::clone(&resources));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    resources.shutdown().await;

    if let Err(e) = served {
        error!("Server error: {e}");
        return Err(e.into());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        // Without a signal handler the server runs until killed
        future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
