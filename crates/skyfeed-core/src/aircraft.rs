//! Simulated aircraft: patrol patterns and the per-tick state advance.

use std::sync::atomic::{AtomicBool, Ordering};

/// Degree-space distance at which a round-trip aircraft counts as having
/// arrived at its leg destination (~0.7 miles at the patrol latitude).
pub const ARRIVAL_THRESHOLD_DEG: f64 = 0.01;

/// How far a fly-over aircraft may drift from its start point on either
/// axis before it snaps back to the start.
pub const EXCURSION_LIMIT_DEG: f64 = 1.0;

/// Altitude band the vertical rate bounces inside, in feet. The check runs
/// after the step, so the value may sit one step outside the band until the
/// reversed rate takes effect on the next tick.
pub const ALTITUDE_FLOOR_FT: i32 = 25_000;
pub const ALTITUDE_CEILING_FT: i32 = 38_000;

/// Motion policy, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patrol {
    /// Shuttle between start and target, reversing course at each end.
    RoundTrip {
        /// True while flying start -> target.
        outbound: bool,
    },
    /// Hold course past the start point and teleport back once the
    /// excursion limit is exceeded.
    FlyOver,
}

/// Leg change reported by [`Aircraft::advance`] so the engine can log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolEvent {
    /// Round-trip aircraft arrived at its target and turned back.
    ReachedTarget,
    /// Round-trip aircraft arrived back at its start and headed out again.
    ReachedStart,
    /// Fly-over aircraft left the patrol box and was put back at its start.
    ResetToStart,
}

/// One simulated aircraft.
///
/// All motion state is mutated only through [`advance`](Self::advance),
/// which the simulation engine calls under the fleet's write lock. The one
/// exception is the announced flag: an atomic the identity-message encoder
/// sets while broadcast sessions hold only the read lock. Concurrent
/// sessions may both see it unset and both announce; that lost update is
/// accepted behavior.
#[derive(Debug)]
pub struct Aircraft {
    icao: String,
    callsign: String,
    latitude: f64,
    longitude: f64,
    altitude: i32,
    ground_speed: i32,
    track: i32,

    start_lat: f64,
    start_lon: f64,
    target_lat: f64,
    target_lon: f64,

    base_lat_rate: f64,
    base_lon_rate: f64,
    base_track: i32,

    lat_rate: f64,
    lon_rate: f64,
    alt_rate: i32,

    patrol: Patrol,
    announced: AtomicBool,
}

impl Aircraft {
    /// Aircraft that shuttles between `start` and `target` forever.
    #[allow(clippy::too_many_arguments)]
    pub fn round_trip(
        icao: &str,
        callsign: &str,
        start_lat: f64,
        start_lon: f64,
        target_lat: f64,
        target_lon: f64,
        speed_factor: f64,
        altitude: i32,
        vertical_rate: i32,
        ground_speed: i32,
    ) -> Self {
        Self::with_patrol(
            icao,
            callsign,
            start_lat,
            start_lon,
            target_lat,
            target_lon,
            speed_factor,
            altitude,
            vertical_rate,
            ground_speed,
            Patrol::RoundTrip { outbound: true },
        )
    }

    /// Aircraft that flies through `start` toward `target` and teleports
    /// back to `start` once it drifts past [`EXCURSION_LIMIT_DEG`].
    #[allow(clippy::too_many_arguments)]
    pub fn fly_over(
        icao: &str,
        callsign: &str,
        start_lat: f64,
        start_lon: f64,
        target_lat: f64,
        target_lon: f64,
        speed_factor: f64,
        altitude: i32,
        vertical_rate: i32,
        ground_speed: i32,
    ) -> Self {
        Self::with_patrol(
            icao,
            callsign,
            start_lat,
            start_lon,
            target_lat,
            target_lon,
            speed_factor,
            altitude,
            vertical_rate,
            ground_speed,
            Patrol::FlyOver,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn with_patrol(
        icao: &str,
        callsign: &str,
        start_lat: f64,
        start_lon: f64,
        target_lat: f64,
        target_lon: f64,
        speed_factor: f64,
        altitude: i32,
        vertical_rate: i32,
        ground_speed: i32,
        patrol: Patrol,
    ) -> Self {
        // Constant per-tick rate along the start -> target unit vector.
        let delta_lat = target_lat - start_lat;
        let delta_lon = target_lon - start_lon;
        let distance = (delta_lat * delta_lat + delta_lon * delta_lon).sqrt();
        let lat_rate = (delta_lat / distance) * speed_factor;
        let lon_rate = (delta_lon / distance) * speed_factor;

        let mut track = delta_lon.atan2(delta_lat).to_degrees() as i32;
        if track < 0 {
            track += 360;
        }

        Self {
            icao: icao.to_string(),
            callsign: callsign.to_string(),
            latitude: start_lat,
            longitude: start_lon,
            altitude,
            ground_speed,
            track,

            start_lat,
            start_lon,
            target_lat,
            target_lon,

            base_lat_rate: lat_rate,
            base_lon_rate: lon_rate,
            base_track: track,

            lat_rate,
            lon_rate,
            alt_rate: vertical_rate,

            patrol,
            announced: AtomicBool::new(false),
        }
    }

    /// Move the aircraft one simulation tick.
    ///
    /// Engine only. Returns the leg change when this step ended a patrol
    /// leg, `None` for an ordinary step.
    pub fn advance(&mut self) -> Option<PatrolEvent> {
        self.latitude += self.lat_rate;
        self.longitude += self.lon_rate;
        self.altitude += self.alt_rate;

        // Bounce the vertical rate off the band edges rather than clamping;
        // the overshoot step is part of the observable signature.
        if self.altitude > ALTITUDE_CEILING_FT || self.altitude < ALTITUDE_FLOOR_FT {
            self.alt_rate = -self.alt_rate;
        }

        match self.patrol {
            Patrol::RoundTrip { outbound } => {
                let (dest_lat, dest_lon) = if outbound {
                    (self.target_lat, self.target_lon)
                } else {
                    (self.start_lat, self.start_lon)
                };
                let dist = ((self.latitude - dest_lat).powi(2)
                    + (self.longitude - dest_lon).powi(2))
                .sqrt();
                if dist >= ARRIVAL_THRESHOLD_DEG {
                    return None;
                }
                if outbound {
                    self.patrol = Patrol::RoundTrip { outbound: false };
                    self.lat_rate = -self.base_lat_rate;
                    self.lon_rate = -self.base_lon_rate;
                    self.track = (self.base_track + 180) % 360;
                    Some(PatrolEvent::ReachedTarget)
                } else {
                    self.patrol = Patrol::RoundTrip { outbound: true };
                    self.lat_rate = self.base_lat_rate;
                    self.lon_rate = self.base_lon_rate;
                    self.track = self.base_track;
                    Some(PatrolEvent::ReachedStart)
                }
            }
            Patrol::FlyOver => {
                if (self.latitude - self.start_lat).abs() > EXCURSION_LIMIT_DEG
                    || (self.longitude - self.start_lon).abs() > EXCURSION_LIMIT_DEG
                {
                    self.latitude = self.start_lat;
                    self.longitude = self.start_lon;
                    Some(PatrolEvent::ResetToStart)
                } else {
                    None
                }
            }
        }
    }

    pub fn icao(&self) -> &str {
        &self.icao
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Current altitude in feet.
    pub fn altitude(&self) -> i32 {
        self.altitude
    }

    /// Ground speed in knots, constant after construction.
    pub fn ground_speed(&self) -> i32 {
        self.ground_speed
    }

    /// Track in degrees, [0, 360).
    pub fn track(&self) -> i32 {
        self.track
    }

    pub fn patrol(&self) -> Patrol {
        self.patrol
    }

    /// Whether any session has generated an identity message for this
    /// aircraft yet.
    pub fn announced(&self) -> bool {
        self.announced.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_announced(&self) {
        self.announced.store(true, Ordering::Relaxed);
    }
}
