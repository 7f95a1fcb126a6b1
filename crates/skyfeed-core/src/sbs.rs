//! SBS-1 BaseStation wire codec.
//!
//! Encodes aircraft snapshots into the three line kinds the feed emits
//! (transmission types 1, 3 and 4 of the 22-field BaseStation socket
//! format) and decodes those same lines back for the watch tools and the
//! test suite. See <http://woodair.net/sbs/article/Barebones42_Socket_Data.htm>
//! for the field layout, which dump1090-style consumers index into.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::aircraft::Aircraft;

/// Every BaseStation line carries exactly this many comma-separated fields.
pub const FIELD_COUNT: usize = 22;

/// The three message kinds a broadcast session can emit per aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Identity,
    Position,
    Velocity,
}

impl MessageKind {
    /// Pick the kind for one aircraft in one burst: identity until the
    /// callsign has been announced, a 20% identity refresh afterwards,
    /// otherwise an even split between position and velocity.
    ///
    /// No random draw happens for an unannounced aircraft.
    pub fn choose<R: Rng + ?Sized>(announced: bool, rng: &mut R) -> Self {
        if !announced || rng.random_range(0..10) < 2 {
            MessageKind::Identity
        } else if rng.random_range(0..2) == 0 {
            MessageKind::Position
        } else {
            MessageKind::Velocity
        }
    }
}

impl Aircraft {
    /// Callsign message (`MSG,1`). Generating it marks the aircraft as
    /// announced; this is the only place that flag is set.
    pub fn identity_message(&self, now: DateTime<Utc>) -> String {
        let (date, time) = format_timestamp(now);
        self.mark_announced();
        format!(
            "MSG,1,1,1,{},1,{},{},{},{},{},,,,,,,,,,,0\n",
            self.icao(),
            date,
            time,
            date,
            time,
            self.callsign(),
        )
    }

    /// Airborne position message (`MSG,3`): altitude plus latitude and
    /// longitude at five decimal places.
    pub fn position_message(&self, now: DateTime<Utc>) -> String {
        let (date, time) = format_timestamp(now);
        format!(
            "MSG,3,1,1,{},1,{},{},{},{},,{},,,{:.5},{:.5},,,0,,0,0\n",
            self.icao(),
            date,
            time,
            date,
            time,
            self.altitude(),
            self.latitude(),
            self.longitude(),
        )
    }

    /// Airborne velocity message (`MSG,4`): ground speed and track, with a
    /// fixed -64 ft/min in the vertical-rate field.
    pub fn velocity_message(&self, now: DateTime<Utc>) -> String {
        let (date, time) = format_timestamp(now);
        format!(
            "MSG,4,1,1,{},1,{},{},{},{},,,{},{},,,-64,,,,,0\n",
            self.icao(),
            date,
            time,
            date,
            time,
            self.ground_speed(),
            self.track(),
        )
    }

    /// Encode the chosen kind for this aircraft.
    pub fn message(&self, kind: MessageKind, now: DateTime<Utc>) -> String {
        match kind {
            MessageKind::Identity => self.identity_message(now),
            MessageKind::Position => self.position_message(now),
            MessageKind::Velocity => self.velocity_message(now),
        }
    }
}

/// The generation and logging timestamp pair; both halves of each pair are
/// always identical on this feed.
fn format_timestamp(now: DateTime<Utc>) -> (String, String) {
    (
        now.format("%Y/%m/%d").to_string(),
        now.format("%H:%M:%S%.3f").to_string(),
    )
}

/// Decode failure for a single feed line.
#[derive(Debug, Error)]
pub enum SbsError {
    #[error("not a BaseStation MSG line: {0:?}")]
    NotAMessage(String),
    #[error("line has {0} fields, expected {FIELD_COUNT}")]
    FieldCount(usize),
    #[error("unsupported transmission type {0:?}")]
    UnsupportedType(String),
    #[error("bad {field} value {value:?}")]
    BadField {
        field: &'static str,
        value: String,
    },
    #[error("bad timestamp {0:?}")]
    BadTimestamp(String),
}

/// One decoded feed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SbsMessage {
    Identity {
        icao: String,
        callsign: String,
        timestamp: DateTime<Utc>,
    },
    Position {
        icao: String,
        altitude: i32,
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    },
    Velocity {
        icao: String,
        ground_speed: i32,
        track: i32,
        timestamp: DateTime<Utc>,
    },
}

impl SbsMessage {
    /// Parse one wire line. Only the three kinds this feed emits are
    /// understood; everything else is a typed error.
    pub fn parse(line: &str) -> Result<Self, SbsError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(',').collect();
        if fields[0] != "MSG" {
            return Err(SbsError::NotAMessage(line.to_string()));
        }
        if fields.len() != FIELD_COUNT {
            return Err(SbsError::FieldCount(fields.len()));
        }

        let icao = fields[4].to_string();
        let timestamp = parse_timestamp(fields[6], fields[7])?;

        match fields[1] {
            "1" => Ok(SbsMessage::Identity {
                icao,
                callsign: fields[10].to_string(),
                timestamp,
            }),
            "3" => Ok(SbsMessage::Position {
                icao,
                altitude: parse_field(fields[11], "altitude")?,
                latitude: parse_field(fields[14], "latitude")?,
                longitude: parse_field(fields[15], "longitude")?,
                timestamp,
            }),
            "4" => Ok(SbsMessage::Velocity {
                icao,
                ground_speed: parse_field(fields[12], "ground speed")?,
                track: parse_field(fields[13], "track")?,
                timestamp,
            }),
            other => Err(SbsError::UnsupportedType(other.to_string())),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            SbsMessage::Identity { .. } => MessageKind::Identity,
            SbsMessage::Position { .. } => MessageKind::Position,
            SbsMessage::Velocity { .. } => MessageKind::Velocity,
        }
    }

    pub fn icao(&self) -> &str {
        match self {
            SbsMessage::Identity { icao, .. }
            | SbsMessage::Position { icao, .. }
            | SbsMessage::Velocity { icao, .. } => icao,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SbsMessage::Identity { timestamp, .. }
            | SbsMessage::Position { timestamp, .. }
            | SbsMessage::Velocity { timestamp, .. } => *timestamp,
        }
    }
}

impl fmt::Display for SbsMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SbsMessage::Identity { icao, callsign, .. } => {
                write!(f, "{icao} ident {callsign}")
            }
            SbsMessage::Position {
                icao,
                altitude,
                latitude,
                longitude,
                ..
            } => {
                write!(f, "{icao} pos {latitude:.5},{longitude:.5} at {altitude} ft")
            }
            SbsMessage::Velocity {
                icao,
                ground_speed,
                track,
                ..
            } => {
                write!(f, "{icao} vel {ground_speed} kt track {track}")
            }
        }
    }
}

fn parse_timestamp(date: &str, time: &str) -> Result<DateTime<Utc>, SbsError> {
    let bad = || SbsError::BadTimestamp(format!("{date} {time}"));
    let date = NaiveDate::parse_from_str(date, "%Y/%m/%d").map_err(|_| bad())?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.3f").map_err(|_| bad())?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

fn parse_field<T: FromStr>(value: &str, field: &'static str) -> Result<T, SbsError> {
    value.parse().map_err(|_| SbsError::BadField {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_aircraft() -> Aircraft {
        Aircraft::round_trip(
            "A1A1A1", "DAL789", 41.38, -81.29, 41.88, -80.79, 0.0003, 30_000, 2, 450,
        )
    }

    fn pinned_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 18, 4, 5).unwrap() + Duration::milliseconds(37)
    }

    #[test]
    fn test_identity_line_exact() {
        let ac = test_aircraft();
        let line = ac.identity_message(pinned_now());
        assert_eq!(
            line,
            "MSG,1,1,1,A1A1A1,1,2024/03/09,18:04:05.037,2024/03/09,18:04:05.037,DAL789,,,,,,,,,,,0\n"
        );
    }

    #[test]
    fn test_position_line_exact() {
        let ac = test_aircraft();
        let line = ac.position_message(pinned_now());
        assert_eq!(
            line,
            "MSG,3,1,1,A1A1A1,1,2024/03/09,18:04:05.037,2024/03/09,18:04:05.037,,30000,,,41.38000,-81.29000,,,0,,0,0\n"
        );
    }

    #[test]
    fn test_velocity_line_exact() {
        let ac = test_aircraft();
        let line = ac.velocity_message(pinned_now());
        assert_eq!(
            line,
            "MSG,4,1,1,A1A1A1,1,2024/03/09,18:04:05.037,2024/03/09,18:04:05.037,,,450,45,,,-64,,,,,0\n"
        );
    }

    #[test]
    fn test_every_kind_has_the_fixed_field_count() {
        let ac = test_aircraft();
        for kind in [
            MessageKind::Identity,
            MessageKind::Position,
            MessageKind::Velocity,
        ] {
            let line = ac.message(kind, pinned_now());
            assert!(line.ends_with('\n'));
            let fields = line.trim_end().split(',').count();
            assert_eq!(fields, FIELD_COUNT, "wrong field count for {kind:?}");
        }
    }

    #[test]
    fn test_only_identity_marks_announced() {
        let ac = test_aircraft();
        ac.position_message(pinned_now());
        ac.velocity_message(pinned_now());
        assert!(!ac.announced());
        ac.identity_message(pinned_now());
        assert!(ac.announced());
    }

    #[test]
    fn test_parse_round_trips_encoded_lines() {
        let ac = test_aircraft();
        let now = pinned_now();

        let msg = SbsMessage::parse(&ac.identity_message(now)).unwrap();
        assert_eq!(
            msg,
            SbsMessage::Identity {
                icao: "A1A1A1".into(),
                callsign: "DAL789".into(),
                timestamp: now,
            }
        );

        let msg = SbsMessage::parse(&ac.position_message(now)).unwrap();
        assert_eq!(
            msg,
            SbsMessage::Position {
                icao: "A1A1A1".into(),
                altitude: 30_000,
                latitude: 41.38,
                longitude: -81.29,
                timestamp: now,
            }
        );

        let msg = SbsMessage::parse(&ac.velocity_message(now)).unwrap();
        assert_eq!(
            msg,
            SbsMessage::Velocity {
                icao: "A1A1A1".into(),
                ground_speed: 450,
                track: 45,
                timestamp: now,
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(matches!(
            SbsMessage::parse("SEL,1,1,1\n"),
            Err(SbsError::NotAMessage(_))
        ));
        assert!(matches!(
            SbsMessage::parse("MSG,3,1,1\n"),
            Err(SbsError::FieldCount(4))
        ));

        // Surface position reports are never emitted by this feed.
        let surface = test_aircraft()
            .position_message(pinned_now())
            .replacen("MSG,3", "MSG,2", 1);
        assert!(matches!(
            SbsMessage::parse(&surface),
            Err(SbsError::UnsupportedType(_))
        ));

        let mangled = test_aircraft()
            .position_message(pinned_now())
            .replace("30000", "none");
        assert!(matches!(
            SbsMessage::parse(&mangled),
            Err(SbsError::BadField { field: "altitude", .. })
        ));
    }

    #[test]
    fn test_messages_serialize_with_kind_tag() {
        let msg = SbsMessage::Velocity {
            icao: "A1A1A1".into(),
            ground_speed: 450,
            track: 45,
            timestamp: pinned_now(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "velocity");
        assert_eq!(json["icao"], "A1A1A1");
        assert_eq!(json["ground_speed"], 450);

        let back: SbsMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_choose_always_identity_until_announced() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(MessageKind::choose(false, &mut rng), MessageKind::Identity);
        }
    }

    #[test]
    fn test_choose_distribution_once_announced() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match MessageKind::choose(true, &mut rng) {
                MessageKind::Identity => counts[0] += 1,
                MessageKind::Position => counts[1] += 1,
                MessageKind::Velocity => counts[2] += 1,
            }
        }
        // 20% refresh, then 50/50 between position and velocity.
        assert!((1_700..=2_300).contains(&counts[0]), "identity: {}", counts[0]);
        assert!((3_600..=4_400).contains(&counts[1]), "position: {}", counts[1]);
        assert!((3_600..=4_400).contains(&counts[2]), "velocity: {}", counts[2]);
    }
}
