use geo::geometry::Point;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Sport type code for running, the default for reported activities.
pub const SPORT_TYPE_RUN: i32 = 0;

/// A raw GPS sample as read from a track file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    /// Elevation in meters
    pub elevation: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64, elevation: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            lat,
            lon,
            elevation,
            timestamp,
        }
    }

    /// Position as a geo point (x = longitude, y = latitude).
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }

    /// Timestamp truncated to whole UTC epoch seconds.
    pub fn unix_time(&self) -> i64 {
        self.timestamp.unix_timestamp()
    }
}

/// A track point enriched with timing, speed and distance relative to the
/// start of its track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
    /// Seconds since the first point of the track
    pub elapsed_seconds: i64,
    /// Speed over the leg ending at this point, in meters per hour
    pub speed: f64,
    /// Distance covered from the start of the track, in meters
    pub cumulative_distance: f64,
}

/// Caller-supplied data that accompanies a track when it is reduced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetadata {
    /// Start time to report instead of the track's first timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    pub calories: i64,
    pub latitude_offset: f64,
    pub longitude_offset: f64,
    pub step_count: i64,
    pub sport_type: i32,
    /// Explicit duration in seconds, replacing the track's own duration.
    pub duration: Option<i64>,
}

/// Aggregate record produced by reducing a track.
///
/// Speeds are in meters per hour. Downstream consumers label them km/h, so
/// the scale is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub(crate) start_time: i64,
    pub(crate) end_time: i64,
    pub(crate) duration_seconds: i64,
    pub(crate) distance: f64,
    pub(crate) calories: i64,
    pub(crate) max_speed: f64,
    pub(crate) avg_speed: f64,
    pub(crate) min_speed: f64,
    pub(crate) max_elevation: f64,
    pub(crate) min_elevation: f64,
    pub(crate) step_count: i64,
    pub(crate) sport_type: i32,
    pub(crate) latitude_offset: f64,
    pub(crate) longitude_offset: f64,
    pub(crate) points: Vec<DerivedPoint>,
}

impl Activity {
    /// Reported start, in UTC epoch seconds.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Reported end, in UTC epoch seconds.
    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }

    /// Total distance in meters.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn calories(&self) -> i64 {
        self.calories
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    pub fn min_speed(&self) -> f64 {
        self.min_speed
    }

    pub fn max_elevation(&self) -> f64 {
        self.max_elevation
    }

    pub fn min_elevation(&self) -> f64 {
        self.min_elevation
    }

    pub fn step_count(&self) -> i64 {
        self.step_count
    }

    pub fn sport_type(&self) -> i32 {
        self.sport_type
    }

    pub fn latitude_offset(&self) -> f64 {
        self.latitude_offset
    }

    pub fn longitude_offset(&self) -> f64 {
        self.longitude_offset
    }

    pub fn points(&self) -> &[DerivedPoint] {
        &self.points
    }

    /// Reported start as a timestamp, if it is representable.
    pub fn started_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.start_time).ok()
    }
}
