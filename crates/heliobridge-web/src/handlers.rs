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

//! Request handlers for the ingestion/query service

use crate::AppState;
use crate::auth::require_api_key;
use crate::validation::parse_sensor_payload;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use heliobridge_tb::TbError;
use heliobridge_types::{EnrichedReading, TelemetrySeries};
use serde_json::{Value, json};
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "HelioBridge Backend";

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": message.into()})),
    )
        .into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": message})),
    )
        .into_response()
}

/// GET /health: liveness probe, no auth, no side effects.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /ingest: validate a sensor reading, enrich it with the derived
/// metrics and forward it to the platform.
///
/// Delivery failure after successful validation is reported as 202
/// `partial_success`: the caller still receives the computed values, only the
/// relay leg failed. One forward attempt per request.
pub async fn ingest_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Err(rejection) = require_api_key(&headers, &state.api_key) {
        return rejection.into_response();
    }

    let Ok(payload) = serde_json::from_str::<Value>(&body) else {
        return bad_request("No JSON data provided");
    };

    let reading = match parse_sensor_payload(&payload) {
        Ok(reading) => reading,
        Err(message) => {
            warn!("Invalid sensor data: {message}");
            return bad_request(message);
        }
    };

    let enriched = EnrichedReading::from_reading(reading, state.panel_area);

    match state.client.post_telemetry(&enriched).await {
        Ok(()) => {
            info!("Reading ingested and forwarded");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": "Data ingested and forwarded successfully",
                    "data": enriched,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to forward reading: {e}");
            (
                StatusCode::ACCEPTED,
                Json(json!({
                    "status": "partial_success",
                    "message": "Data processed but forwarding failed",
                    "error": e.to_string(),
                    "data": enriched,
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/data: last hour of history reshaped into index-aligned arrays.
pub async fn data_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_api_key(&headers, &state.api_key) {
        return rejection.into_response();
    }

    match state.client.fetch_timeseries().await {
        Ok(data) => {
            let series = TelemetrySeries::from_keyed_points(&data);
            info!("Retrieved {} telemetry records", series.timestamps.len());
            Json(series).into_response()
        }
        Err(TbError::AuthenticationFailed) => {
            error!("Platform authentication failed during history query");
            internal_error("Failed to authenticate with the platform")
        }
        Err(e) => {
            error!("History query failed: {e}");
            internal_error("Failed to retrieve data from the platform")
        }
    }
}

/// GET /api/ws-token: hand the platform bearer token to the frontend for its
/// WebSocket subscription, authenticating first if none is cached.
pub async fn ws_token_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_api_key(&headers, &state.api_key) {
        return rejection.into_response();
    }

    match state.client.bearer_token().await {
        Ok(token) => Json(json!({"token": token})).into_response(),
        Err(e) => {
            error!("Failed to obtain platform token: {e}");
            internal_error("Failed to get platform token")
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Endpoint not found"})),
    )
        .into_response()
}
