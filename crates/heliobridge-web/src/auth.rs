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

//! API-key guard for protected endpoints

use axum::Json;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use tracing::warn;

/// Header carrying the service API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Check the request's `X-API-Key` header against the configured secret.
///
/// Composed at the top of each protected handler; the rejection is a ready
/// 401 response so callers can return it directly.
pub fn require_api_key(
    headers: &HeaderMap,
    expected: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    let supplied = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

    match supplied {
        Some(key) if key == expected => Ok(()),
        _ => {
            warn!("Unauthorized access attempt");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid or missing API key"})),
            ))
        }
    }
}
