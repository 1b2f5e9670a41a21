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

pub mod auth;
pub mod handlers;
pub mod validation;

use axum::Router;
use axum::routing::{get, post};
use heliobridge_tb::ThingsBoardClient;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Application state shared by all request handlers.
///
/// Cloned per request; the only mutable piece is the token cache inside the
/// platform client.
#[derive(Clone)]
pub struct AppState {
    pub client: ThingsBoardClient,
    pub api_key: String,
    pub panel_area: f64,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("client", &self.client)
            .field("panel_area", &self.panel_area)
            .finish()
    }
}

/// Build the service router: four endpoints, permissive CORS for the
/// dashboard frontend, JSON 404 fallback.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/ingest", post(handlers::ingest_handler))
        .route("/api/data", get(handlers::data_handler))
        .route("/api/ws-token", get(handlers::ws_token_handler))
        .fallback(handlers::not_found_handler)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
///
/// # Errors
/// Returns error if the server fails to bind or serve
pub async fn start_web_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    info!("Starting web server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
