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

//! Configuration for the retention sweeper

use heliobridge_types::ConfigError;

/// Sweeper configuration, loaded once at startup.
///
/// A separate process from the ingestion service: it needs the tenant
/// credentials and the device, but no device token, API key, or panel area.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub device_id: String,
    /// Telemetry older than this many days is deleted each run
    pub retention_days: i64,
}

fn optional(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_owned())
}

impl SweeperConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = optional("THINGSBOARD_PORT", "8080");
        let retention = optional("DATA_RETENTION_DAYS", "30");

        Ok(Self {
            host: optional("THINGSBOARD_HOST", "localhost"),
            port: port.parse().map_err(|e| ConfigError::InvalidVar {
                var: "THINGSBOARD_PORT",
                message: format!("{e}"),
            })?,
            username: optional("THINGSBOARD_USERNAME", "tenant@thingsboard.org"),
            password: optional("THINGSBOARD_PASSWORD", "tenant"),
            device_id: std::env::var("DEVICE_ID")
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar("DEVICE_ID"))?,
            retention_days: retention.parse().map_err(|e| ConfigError::InvalidVar {
                var: "DATA_RETENTION_DAYS",
                message: format!("{e}"),
            })?,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
