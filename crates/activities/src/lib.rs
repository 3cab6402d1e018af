//! Reduce raw GPS tracks into activity reports.
//!
//! A track (ordered latitude/longitude/elevation/time samples) is reduced to an
//! [`Activity`]: total distance, duration, speed and elevation extremes, and a
//! per-point list with elapsed time, leg speed and cumulative distance.
//!
//! ```rust
//! use activities::{ActivityMetadata, TrackPoint, reduce};
//! use time::macros::datetime;
//!
//! let track = vec![
//!     TrackPoint::new(0.0, 0.0, 0.0, datetime!(2016-03-01 8:00 UTC)),
//!     TrackPoint::new(0.0, 1.0, 0.0, datetime!(2016-03-01 9:00 UTC)),
//! ];
//! let activity = reduce(&track, &ActivityMetadata::default()).unwrap();
//! assert_eq!(activity.duration_seconds(), 3600);
//! ```

pub mod config;
pub mod errors;
pub mod file_parsers;
pub mod models;
pub mod reducer;
pub mod sink;
pub mod wire;

use std::path::Path;

use bytes::Bytes;

pub use config::{OrderingPolicy, OutputFormat, ReduceOptions, ZeroDurationPolicy};
pub use errors::{AppError, PointDefect, ReduceError};
pub use models::{Activity, ActivityMetadata, DerivedPoint, TrackPoint};
pub use reducer::{TrackReducer, reduce};

/// Reads a track file from disk, detecting its format from the extension or
/// the contents.
pub fn load_track(path: &Path) -> Result<Vec<TrackPoint>, AppError> {
    let bytes = Bytes::from(std::fs::read(path)?);
    let points = file_parsers::parse_activity_file(file_parsers::FileType::from_path(path), bytes)?;
    Ok(points)
}

/// Loads and reduces a single track file.
pub fn reduce_file(
    path: &Path,
    metadata: &ActivityMetadata,
    reducer: &TrackReducer,
) -> Result<Activity, AppError> {
    let points = load_track(path)?;
    tracing::info!(path = %path.display(), points = points.len(), "loaded track");
    Ok(reducer.reduce(&points, metadata)?)
}
