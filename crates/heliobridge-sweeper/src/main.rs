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

//! HelioBridge retention sweeper - entry point
//!
//! Long-running companion process that deletes old telemetry from the
//! platform once a day at 02:00 local time.

use chrono::Local;
use heliobridge_sweeper::config::SweeperConfig;
use heliobridge_sweeper::sweep;
use heliobridge_tb::{ThingsBoardClient, TokenCache};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heliobridge_sweeper=debug".parse().unwrap()),
        )
        .init();

    info!("HelioBridge retention sweeper started");

    let config = SweeperConfig::from_env()?;
    info!("Platform: {}", config.base_url());
    info!("Data retention period: {} days", config.retention_days);

    let client = ThingsBoardClient::new(
        config.base_url(),
        config.username.clone(),
        config.password.clone(),
        config.device_id.clone(),
        TokenCache::new(),
    )?;

    let mut next_run = sweep::next_run_after(Local::now().naive_local());
    info!("Next sweep scheduled for {next_run}");

    // Sole scheduling mechanism: wake every minute, compare wall-clock time.
    // No job store, no catch-up for slots missed while the process was down.
    let mut check_interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        check_interval.tick().await;

        let now = Local::now().naive_local();
        if now >= next_run {
            sweep::clean_old_data(&client, config.retention_days).await;
            next_run = sweep::next_run_after(now);
            info!("Next sweep scheduled for {next_run}");
        }
    }
}
