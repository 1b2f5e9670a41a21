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

//! Time-series shapes exchanged with the platform and served to the frontend

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fixed set of metric keys stored on the platform, in validation order.
pub const TELEMETRY_KEYS: [&str; 7] = [
    "voltage",
    "current",
    "irradiance",
    "temperature",
    "battery_voltage",
    "power_output",
    "efficiency",
];

/// Comma-separated key list as expected by the platform's query and delete APIs.
pub fn telemetry_keys_csv() -> String {
    TELEMETRY_KEYS.join(",")
}

/// One sample as returned by the platform: millisecond epoch + stringified value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsPoint {
    pub ts: i64,
    pub value: String,
}

/// Historical telemetry reshaped into index-aligned flat arrays for the frontend.
///
/// `timestamps[i]` describes the same source point as `voltages[i]`,
/// `currents[i]`, and so on, in the order the platform returned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySeries {
    pub timestamps: Vec<String>,
    pub voltages: Vec<f64>,
    pub currents: Vec<f64>,
    pub irradiances: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub battery_voltages: Vec<f64>,
    pub power_outputs: Vec<f64>,
    pub efficiencies: Vec<f64>,
}

fn values_for(data: &HashMap<String, Vec<TsPoint>>, key: &str) -> Vec<f64> {
    data.get(key)
        .map(|points| {
            points
                .iter()
                .map(|p| p.value.parse::<f64>().unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default()
}

fn format_ts(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

impl TelemetrySeries {
    /// Reshape the platform's per-key sample lists into flat arrays.
    ///
    /// Timestamps are taken from the `voltage` series (every write stores all
    /// keys at the same instant, so one series is enough to label the rest) and
    /// rendered human-readable in UTC. Keys absent from the response produce
    /// empty arrays.
    pub fn from_keyed_points(data: &HashMap<String, Vec<TsPoint>>) -> Self {
        let timestamps = data
            .get("voltage")
            .map(|points| points.iter().map(|p| format_ts(p.ts)).collect())
            .unwrap_or_default();

        Self {
            timestamps,
            voltages: values_for(data, "voltage"),
            currents: values_for(data, "current"),
            irradiances: values_for(data, "irradiance"),
            temperatures: values_for(data, "temperature"),
            battery_voltages: values_for(data, "battery_voltage"),
            power_outputs: values_for(data, "power_output"),
            efficiencies: values_for(data, "efficiency"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(samples: &[(i64, &str)]) -> Vec<TsPoint> {
        samples
            .iter()
            .map(|(ts, value)| TsPoint {
                ts: *ts,
                value: (*value).to_owned(),
            })
            .collect()
    }

    #[test]
    fn test_keys_csv() {
        assert_eq!(
            telemetry_keys_csv(),
            "voltage,current,irradiance,temperature,battery_voltage,power_output,efficiency"
        );
    }

    #[test]
    fn test_reshape_is_index_aligned() {
        let mut data = HashMap::new();
        data.insert(
            "voltage".to_owned(),
            points(&[(1_700_000_000_000, "12.3"), (1_700_000_060_000, "12.5")]),
        );
        data.insert(
            "current".to_owned(),
            points(&[(1_700_000_000_000, "1.4"), (1_700_000_060_000, "1.6")]),
        );
        data.insert(
            "efficiency".to_owned(),
            points(&[(1_700_000_000_000, "1.35"), (1_700_000_060_000, "1.41")]),
        );

        let series = TelemetrySeries::from_keyed_points(&data);

        assert_eq!(series.timestamps.len(), 2);
        assert_eq!(series.voltages, vec![12.3, 12.5]);
        assert_eq!(series.currents, vec![1.4, 1.6]);
        assert_eq!(series.efficiencies, vec![1.35, 1.41]);
        // timestamps[i] labels the same source point as voltages[i]
        assert_eq!(series.timestamps[0], "2023-11-14 22:13:20");
        assert_eq!(series.timestamps[1], "2023-11-14 22:14:20");
    }

    #[test]
    fn test_missing_keys_yield_empty_arrays() {
        let mut data = HashMap::new();
        data.insert("voltage".to_owned(), points(&[(1_700_000_000_000, "12.3")]));

        let series = TelemetrySeries::from_keyed_points(&data);

        assert_eq!(series.voltages, vec![12.3]);
        assert_eq!(series.timestamps.len(), 1);
        assert!(series.currents.is_empty());
        assert!(series.irradiances.is_empty());
        assert!(series.temperatures.is_empty());
        assert!(series.battery_voltages.is_empty());
        assert!(series.power_outputs.is_empty());
        assert!(series.efficiencies.is_empty());
    }

    #[test]
    fn test_empty_response_yields_empty_series() {
        let series = TelemetrySeries::from_keyed_points(&HashMap::new());
        assert!(series.timestamps.is_empty());
        assert!(series.voltages.is_empty());
    }

    #[test]
    fn test_unparseable_values_become_zero() {
        let mut data = HashMap::new();
        data.insert(
            "temperature".to_owned(),
            points(&[(1_700_000_000_000, "30.0"), (1_700_000_060_000, "unknown")]),
        );

        let series = TelemetrySeries::from_keyed_points(&data);
        assert_eq!(series.temperatures, vec![30.0, 0.0]);
    }
}
