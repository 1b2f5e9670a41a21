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

//! Daily retention sweep: delete telemetry older than the configured window

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use heliobridge_tb::ThingsBoardClient;
use tracing::{error, info};

/// Local wall-clock hour the daily sweep fires at.
const SWEEP_HOUR: i64 = 2;

/// Epoch-millisecond cutoff: everything up to `now - retention_days` goes.
pub fn cutoff_ts(now: DateTime<Utc>, retention_days: i64) -> i64 {
    (now - Duration::days(retention_days)).timestamp_millis()
}

/// Next occurrence of 02:00 strictly after `now`, in local wall-clock terms.
///
/// Scheduling is always forward-looking: a process that was down at 02:00
/// does not catch up, it waits for the next day's slot.
pub fn next_run_after(now: NaiveDateTime) -> NaiveDateTime {
    let todays_run = now.date().and_time(NaiveTime::MIN) + Duration::hours(SWEEP_HOUR);
    if now < todays_run {
        todays_run
    } else {
        todays_run + Duration::days(1)
    }
}

/// One sweep run: fresh login, one range delete, log the outcome.
///
/// Fire-and-forget per run: failures are logged and swallowed, the next
/// attempt is tomorrow's slot. The bearer token is never shared with the
/// ingestion service (separate process, separate cache).
pub async fn clean_old_data(client: &ThingsBoardClient, retention_days: i64) {
    info!("Starting data cleanup task");

    if let Err(e) = client.authenticate().await {
        error!("Failed to authenticate with the platform: {e}");
        return;
    }

    let cutoff = cutoff_ts(Utc::now(), retention_days);
    match client.delete_timeseries(0, cutoff).await {
        Ok(()) => info!("Successfully cleaned data older than {retention_days} days"),
        Err(e) => error!("Failed to clean old data: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use heliobridge_tb::TokenCache;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn naive(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_cutoff_is_now_minus_retention_in_millis() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let cutoff = cutoff_ts(now, 30);

        let expected = Utc.with_ymd_and_hms(2025, 5, 2, 12, 0, 0).unwrap();
        assert_eq!(cutoff, expected.timestamp_millis());
    }

    #[test]
    fn test_cutoff_with_zero_retention_is_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(cutoff_ts(now, 0), now.timestamp_millis());
    }

    #[test]
    fn test_next_run_before_two_am_is_same_day() {
        assert_eq!(
            next_run_after(naive("2025-06-01T00:30:00")),
            naive("2025-06-01T02:00:00")
        );
    }

    #[test]
    fn test_next_run_after_two_am_is_next_day() {
        assert_eq!(
            next_run_after(naive("2025-06-01T15:00:00")),
            naive("2025-06-02T02:00:00")
        );
    }

    #[test]
    fn test_next_run_at_exactly_two_am_skips_to_next_day() {
        // No catch-up semantics: starting at 02:00 sharp waits a full day
        assert_eq!(
            next_run_after(naive("2025-06-01T02:00:00")),
            naive("2025-06-02T02:00:00")
        );
    }

    #[test]
    fn test_next_run_is_always_in_the_future() {
        for input in [
            "2025-06-01T00:00:00",
            "2025-06-01T01:59:59",
            "2025-06-01T02:00:01",
            "2025-12-31T23:59:59",
        ] {
            let now = naive(input);
            assert!(next_run_after(now) > now, "not in the future for {input}");
        }
    }

    #[tokio::test]
    async fn test_clean_old_data_logs_in_and_deletes_range() {
        let mut server = Server::new_async().await;

        let login = server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"token": "sweep-jwt"}).to_string())
            .expect(1)
            .create_async()
            .await;

        let delete = server
            .mock("DELETE", "/api/plugins/telemetry/DEVICE/dev-1/timeseries/delete")
            .match_header("authorization", "Bearer sweep-jwt")
            .match_body(Matcher::PartialJson(json!({
                "deleteAllDataForKeys": false,
                "startTs": 0,
            })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let client = ThingsBoardClient::new(
            server.url(),
            "tenant@thingsboard.org",
            "tenant",
            "dev-1",
            TokenCache::new(),
        )
        .unwrap();

        clean_old_data(&client, 30).await;

        login.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_clean_old_data_stops_after_failed_login() {
        let mut server = Server::new_async().await;

        let login = server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let delete = server
            .mock(
                "DELETE",
                "/api/plugins/telemetry/DEVICE/dev-1/timeseries/delete",
            )
            .expect(0)
            .create_async()
            .await;

        let client = ThingsBoardClient::new(
            server.url(),
            "tenant@thingsboard.org",
            "tenant",
            "dev-1",
            TokenCache::new(),
        )
        .unwrap();

        // Must not panic or propagate; the run is fire-and-forget
        clean_old_data(&client, 30).await;

        login.assert_async().await;
        delete.assert_async().await;
    }
}
