// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of HelioBridge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! HelioBridge ingestion/query service - entry point
//!
//! Relays validated sensor readings to the telemetry platform and proxies
//! historical-data queries back out to the dashboard frontend.

use anyhow::Result;
use heliobridge_tb::{ThingsBoardClient, TokenCache};
use heliobridge_types::BridgeConfig;
use heliobridge_web::AppState;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!("🚀 Starting HelioBridge Backend v{}", env!("CARGO_PKG_VERSION"));
    info!("📋 Configuration Summary:");
    info!("   Platform: {}", config.base_url());
    info!("   Device ID: {}", config.device_id);
    info!("   Panel area: {} m²", config.panel_area);
    info!("   Listening on port {}", config.bind_port);

    let tokens = TokenCache::new();
    let client = ThingsBoardClient::new(
        config.base_url(),
        config.username.clone(),
        config.password.clone(),
        config.device_id.clone(),
        tokens,
    )?
    .with_device_token(config.device_token.clone());

    // Prime the bearer token so the first query does not pay the login
    // round-trip; the cache refills lazily if this fails
    if client.authenticate().await.is_err() {
        warn!("⚠️ Initial platform authentication failed, will retry on demand");
    }

    let state = AppState {
        client,
        api_key: config.api_key.clone(),
        panel_area: config.panel_area,
    };

    if let Err(e) = heliobridge_web::start_web_server(state, config.bind_port).await {
        error!("❌ Web server failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
