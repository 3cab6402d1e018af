//! Track file parsers for GPX, TCX, and FIT formats.
//!
//! Every format is flattened into a single ordered list of [`TrackPoint`]s.
//! A reportable point needs a position, an elevation and a timestamp, so
//! points missing the latter two are rejected rather than guessed.

use std::io::BufReader;
use std::path::Path;

use bytes::Buf as _;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::models::TrackPoint;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Gpx,
    Tcx,
    Fit,
    Other,
}

impl FileType {
    /// Detects the format from the file contents.
    pub fn detect_from_bytes(bytes: &[u8]) -> Self {
        // FIT headers carry ".FIT" at offset 8
        if bytes.len() >= 12 && &bytes[8..12] == b".FIT" {
            return FileType::Fit;
        }

        let head = &bytes[..bytes.len().min(1024)];
        let head = String::from_utf8_lossy(head);
        if head.contains("<TrainingCenterDatabase") {
            FileType::Tcx
        } else if head.contains("<gpx") {
            FileType::Gpx
        } else {
            FileType::Other
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("gpx") => FileType::Gpx,
            Some("tcx") => FileType::Tcx,
            Some("fit") => FileType::Fit,
            _ => FileType::Other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse GPX file: {0}")]
    GpxError(String),
    #[error("Failed to parse TCX file: {0}")]
    TcxError(String),
    #[error("Failed to parse FIT file: {0}")]
    FitError(String),
    #[error("Unsupported file type: {0:?}")]
    UnsupportedFileType(FileType),
    #[error("Track point {index} has no timestamp")]
    MissingTimestamp { index: usize },
    #[error("Track point {index} has no elevation")]
    MissingElevation { index: usize },
}

/// Parse a track file based on its type.
/// For FileType::Other, attempts to detect the format from the bytes.
pub fn parse_activity_file(file_type: FileType, bytes: Bytes) -> Result<Vec<TrackPoint>, ParseError> {
    let actual_type = if file_type == FileType::Other {
        FileType::detect_from_bytes(&bytes)
    } else {
        file_type
    };

    let points = match actual_type {
        FileType::Gpx => parse_gpx(bytes),
        FileType::Tcx => parse_tcx(bytes),
        FileType::Fit => parse_fit(bytes),
        FileType::Other => Err(ParseError::UnsupportedFileType(actual_type)),
    }?;

    debug!(file_type = ?actual_type, points = points.len(), "parsed track file");
    Ok(points)
}

/// Raw reading before the completeness check.
struct RawPoint {
    lat: f64,
    lon: f64,
    elevation: Option<f64>,
    timestamp: Option<OffsetDateTime>,
}

fn complete(raw: Vec<RawPoint>) -> Result<Vec<TrackPoint>, ParseError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, pt)| {
            let elevation = pt.elevation.ok_or(ParseError::MissingElevation { index })?;
            let timestamp = pt.timestamp.ok_or(ParseError::MissingTimestamp { index })?;
            Ok(TrackPoint::new(pt.lat, pt.lon, elevation, timestamp))
        })
        .collect()
}

/// Parse a GPX file. All tracks and segments are concatenated in file order.
pub fn parse_gpx(bytes: Bytes) -> Result<Vec<TrackPoint>, ParseError> {
    let gpx = gpx::read(bytes.reader()).map_err(|e| ParseError::GpxError(e.to_string()))?;

    let raw = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|seg| &seg.points)
        .map(|pt| RawPoint {
            lat: pt.point().y(),
            lon: pt.point().x(),
            elevation: pt.elevation,
            timestamp: pt.time.map(|t| t.into()),
        })
        .collect();

    complete(raw)
}

/// Parse a TCX (Training Center XML) file.
pub fn parse_tcx(bytes: Bytes) -> Result<Vec<TrackPoint>, ParseError> {
    let mut buf_reader = BufReader::new(bytes.reader());

    let tcx_data =
        tcx::read(&mut buf_reader).map_err(|e| ParseError::TcxError(format!("{e:?}")))?;

    let mut raw = Vec::new();
    let mut skipped = 0usize;

    if let Some(ref activities) = tcx_data.activities {
        for activity in &activities.activities {
            for lap in &activity.laps {
                for track in &lap.tracks {
                    for trackpoint in &track.trackpoints {
                        let Some(ref position) = trackpoint.position else {
                            skipped += 1;
                            continue;
                        };

                        raw.push(RawPoint {
                            lat: position.latitude,
                            lon: position.longitude,
                            elevation: trackpoint.altitude_meters,
                            timestamp: chrono_to_offset_datetime_utc(&trackpoint.time),
                        });
                    }
                }
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped TCX trackpoints without a position");
    }

    complete(raw)
}

/// Convert chrono DateTime<Utc> to time OffsetDateTime.
/// `None` when the instant is outside the range `time` can represent.
fn chrono_to_offset_datetime_utc(dt: &chrono::DateTime<chrono::Utc>) -> Option<OffsetDateTime> {
    let ts = dt.timestamp();
    let ns = dt.timestamp_subsec_nanos();

    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .map(|odt| odt.replace_nanosecond(ns).unwrap_or(odt))
}

/// Convert chrono DateTime<Local> to time OffsetDateTime
fn chrono_to_offset_datetime_local(
    dt: &chrono::DateTime<chrono::Local>,
) -> Option<OffsetDateTime> {
    use chrono::Utc;
    let utc_dt = dt.with_timezone(&Utc);
    chrono_to_offset_datetime_utc(&utc_dt)
}

/// Parse a FIT (Flexible and Interoperable Data Transfer) file.
pub fn parse_fit(bytes: Bytes) -> Result<Vec<TrackPoint>, ParseError> {
    let fit_data =
        fitparser::from_bytes(bytes.as_ref()).map_err(|e| ParseError::FitError(e.to_string()))?;

    let mut raw = Vec::new();

    for record in fit_data {
        if record.kind() != fitparser::profile::field_types::MesgNum::Record {
            continue;
        }

        let mut lat: Option<f64> = None;
        let mut lon: Option<f64> = None;
        let mut elevation: Option<f64> = None;
        let mut timestamp: Option<OffsetDateTime> = None;

        for field in record.fields() {
            match field.name() {
                "position_lat" => {
                    if let fitparser::Value::SInt32(v) = field.value() {
                        lat = Some(semicircles_to_degrees(*v));
                    }
                }
                "position_long" => {
                    if let fitparser::Value::SInt32(v) = field.value() {
                        lon = Some(semicircles_to_degrees(*v));
                    }
                }
                "altitude" | "enhanced_altitude" => {
                    elevation = extract_fit_f64(field.value()).or(elevation);
                }
                "timestamp" => {
                    if let fitparser::Value::Timestamp(t) = field.value() {
                        timestamp = chrono_to_offset_datetime_local(t);
                    }
                }
                _ => {}
            }
        }

        // Records without a fix carry only sensor data
        if let (Some(lat), Some(lon)) = (lat, lon) {
            raw.push(RawPoint {
                lat,
                lon,
                elevation,
                timestamp,
            });
        }
    }

    complete(raw)
}

/// Convert FIT semicircles to degrees.
/// FIT uses semicircles where 2^31 semicircles = 180 degrees.
fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}

fn extract_fit_f64(value: &fitparser::Value) -> Option<f64> {
    match value {
        fitparser::Value::Float32(v) => Some(*v as f64),
        fitparser::Value::Float64(v) => Some(*v),
        fitparser::Value::SInt16(v) => Some(*v as f64),
        fitparser::Value::UInt16(v) => Some(*v as f64),
        fitparser::Value::SInt32(v) => Some(*v as f64),
        fitparser::Value::UInt32(v) => Some(*v as f64),
        _ => None,
    }
}
