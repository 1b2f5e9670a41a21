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

//! Service configuration, populated once at startup from the environment

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

/// Ingestion service configuration.
///
/// Built once in `main` and passed by reference to components; nothing else in
/// the codebase reads the environment directly.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Platform host
    pub host: String,
    /// Platform HTTP port
    pub port: u16,
    /// Tenant account used for bearer-token login
    pub username: String,
    pub password: String,
    /// Platform device the telemetry belongs to
    pub device_id: String,
    /// Device access token used for ingest-side pushes
    pub device_token: String,
    /// Secret expected in the X-API-Key header of protected endpoints
    pub api_key: String,
    /// Solar panel area in square meters, used in the efficiency formula
    pub panel_area: f64,
    /// Telemetry retention window in days
    pub retention_days: i64,
    /// Port the HTTP surface binds to
    pub bind_port: u16,
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

fn optional(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        var,
        message: e.to_string(),
    })
}

impl BridgeConfig {
    /// Load and validate the configuration from the environment.
    ///
    /// The service refuses to start without a device identifier, device token,
    /// and API key; everything else has a default matching a stock local
    /// platform installation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            host: optional("THINGSBOARD_HOST", "localhost"),
            port: parse_var("THINGSBOARD_PORT", &optional("THINGSBOARD_PORT", "8080"))?,
            username: optional("THINGSBOARD_USERNAME", "tenant@thingsboard.org"),
            password: optional("THINGSBOARD_PASSWORD", "tenant"),
            device_id: required("DEVICE_ID")?,
            device_token: required("DEVICE_TOKEN")?,
            api_key: required("API_KEY")?,
            panel_area: parse_var("PANEL_AREA", &optional("PANEL_AREA", "1.5"))?,
            retention_days: parse_var(
                "DATA_RETENTION_DAYS",
                &optional("DATA_RETENTION_DAYS", "30"),
            )?,
            bind_port: parse_var("BIND_PORT", &optional("BIND_PORT", "5000"))?,
        };

        if config.panel_area <= 0.0 {
            return Err(ConfigError::InvalidVar {
                var: "PANEL_AREA",
                message: "panel area must be positive".to_owned(),
            });
        }

        Ok(config)
    }

    /// Platform base URL, e.g. `http://localhost:8080`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BridgeConfig {
        BridgeConfig {
            host: "tb.example.com".to_owned(),
            port: 9090,
            username: "tenant@thingsboard.org".to_owned(),
            password: "tenant".to_owned(),
            device_id: "dev-1".to_owned(),
            device_token: "token-1".to_owned(),
            api_key: "secret".to_owned(),
            panel_area: 1.5,
            retention_days: 30,
            bind_port: 5000,
        }
    }

    #[test]
    fn test_base_url() {
        assert_eq!(config().base_url(), "http://tb.example.com:9090");
    }

    #[test]
    fn test_parse_var_reports_the_variable() {
        let err = parse_var::<u16>("THINGSBOARD_PORT", "not-a-port").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                var: "THINGSBOARD_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_var_accepts_valid_input() {
        let area: f64 = parse_var("PANEL_AREA", "2.25").unwrap();
        assert_eq!(area, 2.25);
        let days: i64 = parse_var("DATA_RETENTION_DAYS", "30").unwrap();
        assert_eq!(days, 30);
    }
}
