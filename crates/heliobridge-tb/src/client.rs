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

//! ThingsBoard REST API client

use crate::errors::{TbError, TbResult};
use crate::token::TokenCache;
use chrono::Utc;
use heliobridge_types::{EnrichedReading, TsPoint, telemetry_keys_csv};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Query window for the history endpoint: the most recent hour.
const QUERY_WINDOW_MS: i64 = 3_600_000;
/// Maximum number of points returned per key.
const QUERY_LIMIT: u32 = 20;
/// Range deletes take longer than regular calls on a loaded platform.
const DELETE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// ThingsBoard REST API client.
///
/// Tenant-level calls (query, delete) authenticate with a bearer token held in
/// the injected [`TokenCache`]; telemetry pushes authenticate through the
/// device access token embedded in the ingest URL.
#[derive(Clone)]
pub struct ThingsBoardClient {
    base_url: String,
    username: String,
    password: String,
    device_id: String,
    device_token: Option<String>,
    client: Client,
    tokens: TokenCache,
}

impl std::fmt::Debug for ThingsBoardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThingsBoardClient")
            .field("base_url", &self.base_url)
            .field("device_id", &self.device_id)
            .finish()
    }
}

impl ThingsBoardClient {
    /// Create a new platform client with the standard 10 second call timeout.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        device_id: impl Into<String>,
        tokens: TokenCache,
    ) -> TbResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TbError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            device_id: device_id.into(),
            device_token: None,
            client,
            tokens,
        })
    }

    /// Attach the device access token required for telemetry pushes.
    pub fn with_device_token(mut self, device_token: impl Into<String>) -> Self {
        self.device_token = Some(device_token.into());
        self
    }

    /// Log in against the platform and cache the resulting bearer token.
    pub async fn authenticate(&self) -> TbResult<String> {
        let url = format!("{}/api/auth/login", self.base_url);
        debug!("Authenticating against {url}");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": self.username,
                "password": self.password,
            }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let login = response.json::<LoginResponse>().await?;
                self.tokens.store(&login.token);
                info!("Authenticated with the platform");
                Ok(login.token)
            }
            status => {
                error!("Platform authentication failed: {status}");
                Err(TbError::AuthenticationFailed)
            }
        }
    }

    /// Cached bearer token, authenticating first if the slot is empty.
    pub async fn bearer_token(&self) -> TbResult<String> {
        if let Some(token) = self.tokens.get() {
            return Ok(token);
        }
        self.authenticate().await
    }

    /// Push one enriched reading to the device telemetry endpoint.
    ///
    /// Single attempt, no retry: delivery failures are reported back to the
    /// caller, which owns the degraded-success contract.
    pub async fn post_telemetry(&self, reading: &EnrichedReading) -> TbResult<()> {
        let device_token = self
            .device_token
            .as_deref()
            .ok_or_else(|| TbError::Config("no device token configured".to_owned()))?;
        let url = format!("{}/api/v1/{}/telemetry", self.base_url, device_token);

        let response = self.client.post(&url).json(reading).send().await?;

        match response.status() {
            StatusCode::OK => {
                info!("Forwarded reading to the platform");
                Ok(())
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                error!("Platform telemetry push failed: {status}");
                Err(TbError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Fetch the last hour of history for the fixed metric keys, at most
    /// [`QUERY_LIMIT`] points per key, no aggregation.
    ///
    /// A rejected bearer token is treated as stale: the slot is cleared, login
    /// runs again and the query is retried exactly once. A second rejection is
    /// surfaced as [`TbError::AuthenticationFailed`].
    pub async fn fetch_timeseries(&self) -> TbResult<HashMap<String, Vec<TsPoint>>> {
        let token = self.bearer_token().await?;
        let mut response = self.timeseries_request(&token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Bearer token rejected, re-authenticating");
            self.tokens.clear();
            let token = self.authenticate().await?;
            response = self.timeseries_request(&token).await?;
        }

        match response.status() {
            StatusCode::OK => {
                let data = response.json::<HashMap<String, Vec<TsPoint>>>().await?;
                debug!("Retrieved history for {} keys", data.len());
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(TbError::AuthenticationFailed),
            status => Err(TbError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn timeseries_request(&self, token: &str) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!(
            "{}/api/plugins/telemetry/DEVICE/{}/values/timeseries",
            self.base_url, self.device_id
        );
        let end_ts = Utc::now().timestamp_millis();
        let start_ts = end_ts - QUERY_WINDOW_MS;

        self.client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("keys", telemetry_keys_csv()),
                ("startTs", start_ts.to_string()),
                ("endTs", end_ts.to_string()),
                ("limit", QUERY_LIMIT.to_string()),
                ("agg", "NONE".to_owned()),
            ])
            .send()
            .await
    }

    /// Delete stored samples for the fixed metric keys in `[start_ts, end_ts]`.
    ///
    /// `deleteAllDataForKeys` stays false: only the given range is removed,
    /// never the keys' full history.
    pub async fn delete_timeseries(&self, start_ts: i64, end_ts: i64) -> TbResult<()> {
        let token = self.bearer_token().await?;
        let url = format!(
            "{}/api/plugins/telemetry/DEVICE/{}/timeseries/delete",
            self.base_url, self.device_id
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "keys": telemetry_keys_csv(),
                "deleteAllDataForKeys": false,
                "startTs": start_ts,
                "endTs": end_ts,
            }))
            .timeout(DELETE_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                info!("Deleted telemetry in range {start_ts}..{end_ts}");
                Ok(())
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                error!("Platform telemetry delete failed: {status}");
                Err(TbError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
