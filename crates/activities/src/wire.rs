//! Legacy wire format for submitting activities.
//!
//! Each point travels as one comma-joined string:
//!
//! ```text
//! latitude,longitude,elevation,elapsed_seconds,speed,cumulative_distance
//! 39.992020,116.301042,40.330000,182,0.000000,253.629896
//! ```
//!
//! and the activity itself uses the field names of the receiving service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Activity, DerivedPoint};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    #[error("expected 6 fields, found {found}")]
    FieldCount { found: usize },

    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

pub fn encode_point(point: &DerivedPoint) -> String {
    format!(
        "{:.6},{:.6},{:.6},{},{:.6},{:.6}",
        point.lat,
        point.lon,
        point.elevation,
        point.elapsed_seconds,
        point.speed,
        point.cumulative_distance
    )
}

pub fn decode_point(encoded: &str) -> Result<DerivedPoint, WireError> {
    let fields: Vec<&str> = encoded.split(',').map(str::trim).collect();
    let [lat, lon, elevation, elapsed, speed, distance] = fields.as_slice() else {
        return Err(WireError::FieldCount {
            found: fields.len(),
        });
    };

    Ok(DerivedPoint {
        lat: parse_float("latitude", lat)?,
        lon: parse_float("longitude", lon)?,
        elevation: parse_float("elevation", elevation)?,
        elapsed_seconds: parse_field("elapsed_seconds", elapsed)?,
        speed: parse_float("speed", speed)?,
        cumulative_distance: parse_float("cumulative_distance", distance)?,
    })
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, WireError> {
    value.parse().map_err(|_| WireError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Like [`parse_field`], but `NaN` and infinities are not numbers here.
fn parse_float(field: &'static str, value: &str) -> Result<f64, WireError> {
    let parsed: f64 = parse_field(field, value)?;
    if !parsed.is_finite() {
        return Err(WireError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

/// An activity in the shape the receiving service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyActivity {
    #[serde(rename = "longitudeOffset")]
    pub longitude_offset: f64,
    #[serde(rename = "sportType")]
    pub sport_type: i32,
    #[serde(rename = "maxSpeed")]
    pub max_speed: f64,
    pub calories: i64,
    #[serde(rename = "aSpeed")]
    pub avg_speed: f64,
    #[serde(rename = "maxHeight")]
    pub max_height: f64,
    #[serde(rename = "stepcount")]
    pub step_count: i64,
    #[serde(rename = "minSpeed")]
    pub min_speed: f64,
    #[serde(rename = "sportTime")]
    pub sport_time: i64,
    #[serde(rename = "endTime")]
    pub end_time: i64,
    pub distance: f64,
    #[serde(rename = "startTime")]
    pub start_time: i64,
    #[serde(rename = "latitudeOffset")]
    pub latitude_offset: f64,
    #[serde(rename = "minHeight")]
    pub min_height: f64,
    pub location: Vec<String>,
}

impl LegacyActivity {
    /// Decodes the `location` strings back into points.
    pub fn points(&self) -> Result<Vec<DerivedPoint>, WireError> {
        self.location.iter().map(|s| decode_point(s)).collect()
    }
}

impl From<&Activity> for LegacyActivity {
    fn from(activity: &Activity) -> Self {
        Self {
            longitude_offset: activity.longitude_offset(),
            sport_type: activity.sport_type(),
            max_speed: activity.max_speed(),
            calories: activity.calories(),
            avg_speed: activity.avg_speed(),
            max_height: activity.max_elevation(),
            step_count: activity.step_count(),
            min_speed: activity.min_speed(),
            sport_time: activity.duration_seconds(),
            end_time: activity.end_time(),
            distance: activity.distance(),
            start_time: activity.start_time(),
            latitude_offset: activity.latitude_offset(),
            min_height: activity.min_elevation(),
            location: activity.points().iter().map(encode_point).collect(),
        }
    }
}

/// Envelope for submitting one or more activities in a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHistory {
    #[serde(rename = "reportHistory")]
    pub report_history: Vec<LegacyActivity>,
}

impl<'a> FromIterator<&'a Activity> for ReportHistory {
    fn from_iter<I: IntoIterator<Item = &'a Activity>>(iter: I) -> Self {
        Self {
            report_history: iter.into_iter().map(LegacyActivity::from).collect(),
        }
    }
}
