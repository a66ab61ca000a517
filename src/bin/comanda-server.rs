// ABOUTME: Server binary for the Comanda order-intake and catalog API
// ABOUTME: Loads configuration, initializes storage and logging, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Comanda API Server Binary
//!
//! Starts the HTTP API with administrator authentication, order admission
//! gating, catalog storage, and WhatsApp order notifications.

use anyhow::{Context, Result};
use clap::Parser;
use comanda::{
    auth::TokenService,
    config::ServerConfig,
    database::Database,
    logging,
    notifications::{NoopNotifier, OrderNotifier, WhatsAppNotifier},
    resources::ServerResources,
    routes,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "comanda-server")]
#[command(about = "Comanda - Order intake and catalog API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Comanda API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    info!("Database initialized: {}", config.database.url);

    let tokens = TokenService::new(&config.auth);

    let notifier: Arc<dyn OrderNotifier> = match config.notifications.clone() {
        Some(notification_config) => {
            info!("WhatsApp notifications enabled");
            Arc::new(WhatsAppNotifier::new(notification_config))
        }
        None => {
            info!("WhatsApp notifications disabled (Twilio not configured)");
            Arc::new(NoopNotifier)
        }
    };

    let resources = Arc::new(ServerResources::new(database, tokens, notifier));
    let app = routes::router(resources, &config);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server is running on port {}", config.http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
