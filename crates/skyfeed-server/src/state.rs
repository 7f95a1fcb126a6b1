//! Process-wide fleet state.
//!
//! One simulation task holds the write half of the lock; every broadcast
//! session shares the read half. Sessions keep their read guard across the
//! socket writes of a burst so each burst sees a single simulation frame,
//! which is why this is tokio's RwLock and not std's.

use skyfeed_core::{Aircraft, PatrolEvent};
use tokio::sync::{RwLock, RwLockReadGuard};

/// Center of the simulated patrol area (Ashtabula, OH).
pub const PATROL_LAT: f64 = 41.88;
pub const PATROL_LON: f64 = -80.79;

/// One aircraft's patrol event from a simulation step, for the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegReport {
    pub icao: String,
    pub callsign: String,
    pub event: PatrolEvent,
}

#[derive(Debug)]
pub struct Fleet {
    aircraft: RwLock<Vec<Aircraft>>,
}

impl Fleet {
    pub fn new(aircraft: Vec<Aircraft>) -> Self {
        Self {
            aircraft: RwLock::new(aircraft),
        }
    }

    /// The fixed three-aircraft fleet every server starts with. Two fly a
    /// round-trip patrol into the target and back; the third overflies it
    /// and resets, so listeners see both kinds of motion discontinuity.
    pub fn standard_patrol() -> Self {
        Self::new(vec![
            // Starts SW, flies NE to the target, then back
            Aircraft::round_trip(
                "A1A1A1",
                "DAL789",
                PATROL_LAT - 0.5,
                PATROL_LON - 0.5,
                PATROL_LAT,
                PATROL_LON,
                0.0003,
                30_000,
                2,
                450,
            ),
            // Starts NW, flies SE to the target, then back
            Aircraft::round_trip(
                "B2B2B2",
                "AAL123",
                PATROL_LAT + 0.5,
                PATROL_LON - 0.5,
                PATROL_LAT,
                PATROL_LON,
                0.00035,
                35_000,
                -1,
                500,
            ),
            // Starts S, overflies the target and resets to start
            Aircraft::fly_over(
                "C3C3C3",
                "SWA456",
                PATROL_LAT - 0.5,
                PATROL_LON + 0.1,
                PATROL_LAT,
                PATROL_LON,
                0.00028,
                28_000,
                1,
                420,
            ),
        ])
    }

    /// Advance every aircraft by one tick, in fleet order, under the write
    /// half of the lock. Returns a report per aircraft that turned around
    /// or reset this tick.
    pub async fn advance_all(&self) -> Vec<LegReport> {
        let mut aircraft = self.aircraft.write().await;
        let mut reports = Vec::new();
        for ac in aircraft.iter_mut() {
            if let Some(event) = ac.advance() {
                reports.push(LegReport {
                    icao: ac.icao().to_string(),
                    callsign: ac.callsign().to_string(),
                    event,
                });
            }
        }
        reports
    }

    /// Shared read access for broadcast sessions. The returned guard pins
    /// the current frame until dropped.
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<Aircraft>> {
        self.aircraft.read().await
    }
}
