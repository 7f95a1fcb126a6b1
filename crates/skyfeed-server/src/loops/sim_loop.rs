//! The single-writer simulation loop.
//!
//! Runs in the background for the life of the process, advancing every
//! aircraft one step per tick under the write half of the fleet lock.
//! Broadcast sessions wait at their read acquisition while a tick is in
//! progress. This loop has no failure path and never returns.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::config::Config;
use crate::state::Fleet;
use skyfeed_core::PatrolEvent;

/// Start the simulation loop.
pub async fn run_sim_loop(fleet: Arc<Fleet>, config: Config) {
    let mut ticker = interval(Duration::from_millis(config.sim_tick_ms));

    loop {
        ticker.tick().await;

        for report in fleet.advance_all().await {
            match report.event {
                PatrolEvent::ReachedTarget => {
                    tracing::info!(
                        "Aircraft {} ({}) reached target, turning back to start",
                        report.callsign,
                        report.icao
                    );
                }
                PatrolEvent::ReachedStart => {
                    tracing::info!(
                        "Aircraft {} ({}) reached start, turning back to target",
                        report.callsign,
                        report.icao
                    );
                }
                PatrolEvent::ResetToStart => {
                    tracing::info!(
                        "Aircraft {} ({}) overflew the patrol area, resetting to start",
                        report.callsign,
                        report.icao
                    );
                }
            }
        }
    }
}
