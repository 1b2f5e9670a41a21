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

//! Ingest payload validation

use heliobridge_types::SensorReading;
use serde_json::Value;

/// Required fields, checked in this order; the first failure names the field.
const REQUIRED_FIELDS: [&str; 5] = [
    "voltage",
    "current",
    "irradiance",
    "temperature",
    "battery_voltage",
];

/// Accept JSON numbers and numeric strings; sensors on flaky firmware have
/// been seen sending both.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Validate an ingest body and build the typed reading from it.
pub fn parse_sensor_payload(payload: &Value) -> Result<SensorReading, String> {
    let object = payload
        .as_object()
        .ok_or_else(|| "Data must be a JSON object".to_owned())?;

    let mut values = [0.0_f64; REQUIRED_FIELDS.len()];
    for (slot, field) in values.iter_mut().zip(REQUIRED_FIELDS) {
        let value = object
            .get(field)
            .ok_or_else(|| format!("Missing required field: {field}"))?;
        *slot = numeric(value).ok_or_else(|| format!("Invalid value for {field}: must be a number"))?;
    }

    let timestamp = object
        .get("timestamp")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);

    Ok(SensorReading {
        voltage: values[0],
        current: values[1],
        irradiance: values[2],
        temperature: values[3],
        battery_voltage: values[4],
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "voltage": 12.3,
            "current": 1.4,
            "irradiance": 850,
            "temperature": 30,
            "battery_voltage": 12.6
        })
    }

    #[test]
    fn test_valid_payload_parses() {
        let reading = parse_sensor_payload(&valid_payload()).unwrap();
        assert_eq!(reading.voltage, 12.3);
        assert_eq!(reading.current, 1.4);
        assert_eq!(reading.irradiance, 850.0);
        assert_eq!(reading.temperature, 30.0);
        assert_eq!(reading.battery_voltage, 12.6);
        assert!(reading.timestamp.is_none());
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for field in REQUIRED_FIELDS {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(field);

            let err = parse_sensor_payload(&payload).unwrap_err();
            assert_eq!(err, format!("Missing required field: {field}"));
        }
    }

    #[test]
    fn test_each_non_numeric_field_is_named() {
        for field in REQUIRED_FIELDS {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap()[field] = json!("garbage");

            let err = parse_sensor_payload(&payload).unwrap_err();
            assert_eq!(err, format!("Invalid value for {field}: must be a number"));
        }
    }

    #[test]
    fn test_field_order_determines_first_error() {
        // voltage is checked before battery_voltage
        let mut payload = valid_payload();
        let object = payload.as_object_mut().unwrap();
        object.remove("voltage");
        object.remove("battery_voltage");

        let err = parse_sensor_payload(&payload).unwrap_err();
        assert_eq!(err, "Missing required field: voltage");
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap()["voltage"] = json!("12.3");

        let reading = parse_sensor_payload(&payload).unwrap();
        assert_eq!(reading.voltage, 12.3);
    }

    #[test]
    fn test_booleans_are_not_numbers() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap()["current"] = json!(true);

        let err = parse_sensor_payload(&payload).unwrap_err();
        assert_eq!(err, "Invalid value for current: must be a number");
    }

    #[test]
    fn test_non_object_bodies_are_rejected() {
        for payload in [json!([1, 2, 3]), json!("reading"), json!(42), Value::Null] {
            let err = parse_sensor_payload(&payload).unwrap_err();
            assert_eq!(err, "Data must be a JSON object");
        }
    }

    #[test]
    fn test_timestamp_is_passed_through() {
        let mut payload = valid_payload();
        payload
            .as_object_mut()
            .unwrap()
            .insert("timestamp".to_owned(), json!("2025-06-01T12:00:00Z"));

        let reading = parse_sensor_payload(&payload).unwrap();
        assert_eq!(reading.timestamp.as_deref(), Some("2025-06-01T12:00:00Z"));
    }
}
