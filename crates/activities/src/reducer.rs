//! Track-to-activity reduction.
//!
//! A track is walked once, left to right. Each point is compared against the
//! previous one (the first point against itself) to get the leg distance and
//! the speed over that leg. Totals and extremes are accumulated along the way
//! and the result is packed into an [`Activity`].

use std::cmp::Ordering;

use geo::{Distance as _, HaversineMeasure, geometry::Point};
use tracing::{debug, warn};

use crate::{
    config::{OrderingPolicy, ReduceOptions, ZeroDurationPolicy},
    errors::{PointDefect, ReduceError},
    models::{Activity, ActivityMetadata, DerivedPoint, TrackPoint},
};

/// Sphere radius used for leg distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_367_000.0;

/// Converts meters per second into meters per hour. The downstream service
/// labels the result km/h.
const SPEED_SCALE: f64 = 3600.0;

const SPHERE: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_M);

/// Great-circle distance in meters between two points.
pub fn haversine_distance(from: Point, to: Point) -> f64 {
    SPHERE.distance(from, to)
}

/// Reduces a track with the default options.
pub fn reduce(points: &[TrackPoint], metadata: &ActivityMetadata) -> Result<Activity, ReduceError> {
    TrackReducer::default().reduce(points, metadata)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackReducer {
    options: ReduceOptions,
}

impl TrackReducer {
    pub fn new(options: ReduceOptions) -> Self {
        Self { options }
    }

    /// Derives an [`Activity`] from an ordered, non-empty track.
    ///
    /// Per-point elapsed times are measured from the track's first timestamp.
    /// `metadata.start_time` only shifts the reported start and end.
    pub fn reduce(
        &self,
        points: &[TrackPoint],
        metadata: &ActivityMetadata,
    ) -> Result<Activity, ReduceError> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(ReduceError::EmptyTrack);
        };
        check_offset("latitude_offset", metadata.latitude_offset)?;
        check_offset("longitude_offset", metadata.longitude_offset)?;

        let track_start = first.unix_time();
        let track_end = last.unix_time();
        let raw_duration = track_end - track_start;
        let time_offset = metadata
            .start_time
            .map_or(0, |start| start.unix_timestamp() - track_start);

        let state = points.iter().enumerate().try_fold(
            ReduceState::with_capacity(points.len()),
            |mut state, (index, point)| {
                state.next_point(index, point, track_start, self.options.ordering)?;
                Ok::<_, ReduceError>(state)
            },
        )?;

        let avg_speed = if raw_duration > 0 {
            state.cumulative_distance / raw_duration as f64 * SPEED_SCALE
        } else {
            match self.options.zero_duration {
                ZeroDurationPolicy::Reject => {
                    return Err(ReduceError::DegenerateDuration {
                        duration_seconds: raw_duration,
                    });
                }
                ZeroDurationPolicy::ZeroSpeed => 0.0,
            }
        };

        let (Some(min_speed), Some(max_speed), Some(min_elevation), Some(max_elevation)) = (
            state.speed.min,
            state.speed.max,
            state.elevation.min,
            state.elevation.max,
        ) else {
            return Err(ReduceError::EmptyTrack);
        };

        debug!(
            points = state.points.len(),
            distance = state.cumulative_distance,
            duration = raw_duration,
            "reduced track"
        );

        Ok(Activity {
            start_time: track_start + time_offset,
            end_time: track_end + time_offset,
            duration_seconds: metadata.duration.unwrap_or(raw_duration),
            distance: state.cumulative_distance,
            calories: metadata.calories,
            max_speed,
            avg_speed,
            min_speed,
            max_elevation,
            min_elevation,
            step_count: metadata.step_count,
            sport_type: metadata.sport_type,
            latitude_offset: metadata.latitude_offset,
            longitude_offset: metadata.longitude_offset,
            points: state.points,
        })
    }
}

fn check_offset(field: &'static str, value: f64) -> Result<(), ReduceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ReduceError::InvalidOffset { field, value })
    }
}

fn check_point(point: &TrackPoint) -> Result<(), PointDefect> {
    if !point.lat.is_finite() {
        return Err(PointDefect::NonFiniteLatitude(point.lat));
    }
    if !(-90.0..=90.0).contains(&point.lat) {
        return Err(PointDefect::LatitudeOutOfRange(point.lat));
    }
    if !point.lon.is_finite() {
        return Err(PointDefect::NonFiniteLongitude(point.lon));
    }
    if !(-180.0..=180.0).contains(&point.lon) {
        return Err(PointDefect::LongitudeOutOfRange(point.lon));
    }
    if !point.elevation.is_finite() {
        return Err(PointDefect::NonFiniteElevation(point.elevation));
    }
    Ok(())
}

/// Running minimum and maximum of a series.
#[derive(Debug, Clone, Copy, Default)]
struct Extremes {
    min: Option<f64>,
    max: Option<f64>,
}

impl Extremes {
    fn observe(&mut self, value: f64) {
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
    }
}

/// Accumulator carried across the walk over a track.
#[derive(Debug, Clone, Default)]
struct ReduceState {
    previous: Option<Point>,
    previous_elapsed: i64,
    cumulative_distance: f64,
    speed: Extremes,
    elevation: Extremes,
    points: Vec<DerivedPoint>,
}

impl ReduceState {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    fn next_point(
        &mut self,
        index: usize,
        point: &TrackPoint,
        track_start: i64,
        ordering: OrderingPolicy,
    ) -> Result<(), ReduceError> {
        check_point(point).map_err(|defect| ReduceError::InvalidPoint { index, defect })?;

        let current = point.point();
        let leg = haversine_distance(self.previous.unwrap_or(current), current);
        let elapsed = point.unix_time() - track_start;
        let delta = elapsed - self.previous_elapsed;

        let speed = match delta.cmp(&0) {
            Ordering::Greater => leg / delta as f64 * SPEED_SCALE,
            Ordering::Equal => 0.0,
            Ordering::Less => match ordering {
                OrderingPolicy::Strict => {
                    return Err(ReduceError::InvalidPoint {
                        index,
                        defect: PointDefect::TimestampRegression {
                            previous_elapsed: self.previous_elapsed,
                            elapsed,
                        },
                    });
                }
                OrderingPolicy::Tolerant => {
                    warn!(index, delta, "timestamp goes backwards, reporting zero speed");
                    0.0
                }
            },
        };

        self.cumulative_distance += leg;
        self.speed.observe(speed);
        self.elevation.observe(point.elevation);

        self.points.push(DerivedPoint {
            lat: point.lat,
            lon: point.lon,
            elevation: point.elevation,
            elapsed_seconds: elapsed,
            speed,
            cumulative_distance: self.cumulative_distance,
        });

        self.previous = Some(current);
        self.previous_elapsed = elapsed;
        Ok(())
    }
}
