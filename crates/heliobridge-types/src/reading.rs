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

//! Sensor readings and the derived metrics computed on ingest

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Raw reading as delivered by sensor hardware, one per ingest request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub voltage: f64,
    pub current: f64,
    pub irradiance: f64,
    pub temperature: f64,
    pub battery_voltage: f64,
    /// ISO-8601 timestamp; defaulted to the current UTC time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Reading forwarded to the platform: raw fields plus the two derived metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedReading {
    pub timestamp: String,
    pub voltage: f64,
    pub current: f64,
    pub irradiance: f64,
    pub temperature: f64,
    pub battery_voltage: f64,
    pub power_output: f64,
    pub efficiency: f64,
}

/// Instantaneous panel power output in watts.
pub fn power_output(voltage: f64, current: f64) -> f64 {
    voltage * current
}

/// Panel efficiency in percent, rounded to two decimal places.
///
/// Zero whenever `irradiance` or `panel_area` is non-positive, and never
/// negative (a discharging panel reports 0.0, not a negative percentage).
pub fn efficiency(voltage: f64, current: f64, irradiance: f64, panel_area: f64) -> f64 {
    if irradiance <= 0.0 || panel_area <= 0.0 {
        return 0.0;
    }

    let raw = (power_output(voltage, current) / (irradiance * panel_area)) * 100.0;
    ((raw * 100.0).round() / 100.0).max(0.0)
}

impl EnrichedReading {
    /// Enrich a validated reading with the derived metrics, defaulting the
    /// timestamp to now when the sensor did not supply one.
    pub fn from_reading(reading: SensorReading, panel_area: f64) -> Self {
        let timestamp = reading
            .timestamp
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        Self {
            timestamp,
            voltage: reading.voltage,
            current: reading.current,
            irradiance: reading.irradiance,
            temperature: reading.temperature,
            battery_voltage: reading.battery_voltage,
            power_output: power_output(reading.voltage, reading.current),
            efficiency: efficiency(
                reading.voltage,
                reading.current,
                reading.irradiance,
                panel_area,
            ),
        }
    }
}
