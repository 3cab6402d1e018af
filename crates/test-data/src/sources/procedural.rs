//! Procedural track generation.

use activities::{TrackPoint, reducer::haversine_distance};
use geo::geometry::Point;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::{Duration, OffsetDateTime, macros::datetime};

use crate::config::BoundingBox;
use crate::profiles::{self, AthleteProfile};
use crate::terrain::ElevationGenerator;

/// Configuration for procedural track generation.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    pub bounds: BoundingBox,
    /// Timestamp of the first point.
    pub start_time: OffsetDateTime,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// GPS elevation jitter standard deviation in meters.
    pub elevation_jitter_m: f64,
    /// Approximate distance between track points in meters.
    pub point_spacing_m: f64,
    /// Probability of inserting a pause (0.0 - 1.0).
    pub pause_probability: f64,
    /// Duration range for pauses (min, max) in seconds.
    pub pause_duration_range: (f64, f64),
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_meters: 5000.0,
            bounds: crate::config::Region::HAIDIAN,
            start_time: datetime!(2016-03-01 8:00 UTC),
            gps_jitter_m: 3.0,
            elevation_jitter_m: 2.0,
            point_spacing_m: 10.0,
            pause_probability: 0.02,
            pause_duration_range: (30.0, 180.0),
        }
    }
}

fn point(lat: f64, lon: f64) -> Point {
    Point::new(lon, lat)
}

/// Generates synthetic GPS tracks with realistic characteristics.
pub struct ProceduralGenerator {
    config: TrackConfig,
    elevation: ElevationGenerator,
}

impl ProceduralGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            config: TrackConfig::default(),
            elevation: ElevationGenerator::new(seed),
        }
    }

    pub fn for_region(bounds: BoundingBox, seed: u32) -> Self {
        Self {
            config: TrackConfig {
                bounds,
                ..Default::default()
            },
            elevation: ElevationGenerator::new(seed),
        }
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    pub fn with_start_time(mut self, start_time: OffsetDateTime) -> Self {
        self.config.start_time = start_time;
        self
    }

    pub fn with_gps_jitter(mut self, meters: f64) -> Self {
        self.config.gps_jitter_m = meters;
        self
    }

    pub fn with_elevation(mut self, elevation: ElevationGenerator) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_pauses(mut self, probability: f64, min_sec: f64, max_sec: f64) -> Self {
        self.config.pause_probability = probability;
        self.config.pause_duration_range = (min_sec, max_sec);
        self
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Generates a track; the profile sets speed from terrain grade.
    pub fn generate(&self, profile: &dyn AthleteProfile, rng: &mut impl Rng) -> Vec<TrackPoint> {
        let start = self.config.bounds.random_point(rng);

        let path = self.generate_path(start, rng);
        self.apply_timing(path, profile, rng)
    }

    /// Random walk with momentum, coordinates only.
    pub fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let mut path = vec![start];
        let mut current = start;
        let mut total_distance = 0.0;
        let mut heading = rng.gen_range(0.0..std::f64::consts::TAU);

        while total_distance < self.config.distance_meters {
            heading += rng.gen_range(-0.3..0.3);
            let step = self.config.point_spacing_m * rng.gen_range(0.8..1.2);

            // 1 degree of latitude is roughly 111 km
            let lat_delta = (step * heading.cos()) / 111_000.0;
            let lon_delta = (step * heading.sin()) / (111_000.0 * current.0.to_radians().cos());

            let (next_lat, next_lon, bounced_heading) =
                self.apply_bounds(current.0 + lat_delta, current.1 + lon_delta, heading);
            heading = bounced_heading;

            current = (next_lat, next_lon);
            path.push(current);
            total_distance += step;
        }

        path
    }

    /// Keeps the walk inside the bounds by reflecting the heading.
    fn apply_bounds(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut new_heading = heading;

        let lat = if lat < b.min_lat {
            new_heading = std::f64::consts::PI - heading;
            b.min_lat + (b.min_lat - lat).min(0.001)
        } else if lat > b.max_lat {
            new_heading = std::f64::consts::PI - heading;
            b.max_lat - (lat - b.max_lat).min(0.001)
        } else {
            lat
        };

        let lon = if lon < b.min_lon {
            new_heading = -heading;
            b.min_lon + (b.min_lon - lon).min(0.001)
        } else if lon > b.max_lon {
            new_heading = -heading;
            b.max_lon - (lon - b.max_lon).min(0.001)
        } else {
            lon
        };

        (lat, lon, new_heading)
    }

    fn apply_timing(
        &self,
        path: Vec<(f64, f64)>,
        profile: &dyn AthleteProfile,
        rng: &mut impl Rng,
    ) -> Vec<TrackPoint> {
        let jitter = Normal::new(0.0, self.config.gps_jitter_m / 111_000.0).ok();
        let elev_jitter = Normal::new(0.0, self.config.elevation_jitter_m).ok();

        let mut result = Vec::with_capacity(path.len());
        let mut timestamp = self.config.start_time;
        let mut previous: Option<(f64, f64)> = None;

        for (lat, lon) in path {
            if let Some((prev_lat, prev_lon)) = previous {
                let distance = haversine_distance(point(prev_lat, prev_lon), point(lat, lon));
                let prev_elev = self.elevation.elevation_at(prev_lat, prev_lon);
                let curr_elev = self.elevation.elevation_at(lat, lon);
                let grade = if distance > 0.0 {
                    (curr_elev - prev_elev) / distance
                } else {
                    0.0
                };

                let variance = profiles::sample_variance(profile, rng);
                let speed = profiles::speed_at_grade(profile, grade, variance);

                let pause_seconds = if rng.r#gen::<f64>() < self.config.pause_probability {
                    let (min, max) = self.config.pause_duration_range;
                    rng.gen_range(min..=max)
                } else {
                    0.0
                };

                timestamp += Duration::seconds_f64(distance / speed + pause_seconds);
            }

            let lat_noise = jitter.map_or(0.0, |n| n.sample(rng));
            let lon_noise = jitter.map_or(0.0, |n| n.sample(rng));
            let elev_noise = elev_jitter.map_or(0.0, |n| n.sample(rng));

            result.push(TrackPoint::new(
                lat + lat_noise,
                lon + lon_noise,
                self.elevation.elevation_at(lat, lon) + elev_noise,
                timestamp,
            ));
            previous = Some((lat, lon));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::RunnerProfile;
    use crate::seeded_rng;

    #[test]
    fn test_generate_track() {
        let track_gen = ProceduralGenerator::new(42).with_distance(1000.0);
        let track = track_gen.generate(&RunnerProfile::default(), &mut seeded_rng(42));

        assert!(track.len() > 10);
        assert_eq!(track[0].timestamp, track_gen.config().start_time);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let track_gen = ProceduralGenerator::new(42).with_distance(500.0);
        let track = track_gen.generate(&RunnerProfile::default(), &mut seeded_rng(7));

        for window in track.windows(2) {
            assert!(window[1].timestamp >= window[0].timestamp);
        }
    }

    #[test]
    fn test_same_seed_same_track() {
        let track_gen = ProceduralGenerator::new(1).with_distance(300.0);
        let a = track_gen.generate(&RunnerProfile::default(), &mut seeded_rng(9));
        let b = track_gen.generate(&RunnerProfile::default(), &mut seeded_rng(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_stays_in_bounds() {
        let track_gen = ProceduralGenerator::new(3)
            .with_distance(20_000.0)
            .with_point_spacing(50.0);
        let start = track_gen.config().bounds.center();
        let path = track_gen.generate_path(start, &mut seeded_rng(3));
        let b = track_gen.config().bounds;
        for (lat, lon) in path {
            assert!(lat >= b.min_lat - 0.01 && lat <= b.max_lat + 0.01);
            assert!(lon >= b.min_lon - 0.01 && lon <= b.max_lon + 0.01);
        }
    }
}
