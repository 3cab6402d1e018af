//! End-to-end tests over generated tracks: reduction properties, file loading
//! and the legacy wire format.
//!
//! Run with: `cargo nextest run -p activities`

use std::path::PathBuf;

use activities::{
    ActivityMetadata, ReduceError, ReduceOptions, TrackPoint, TrackReducer, ZeroDurationPolicy,
    file_parsers::{FileType, parse_activity_file},
    reduce, reduce_file,
    wire::{LegacyActivity, ReportHistory},
};
use bytes::Bytes;
use test_data::prelude::*;
use time::macros::datetime;

fn generated_run(seed: u64, meters: f64) -> Vec<TrackPoint> {
    ProceduralGenerator::new(seed as u32)
        .with_distance(meters)
        .generate(&RunnerProfile::default(), &mut seeded_rng(seed))
}

/// Writes a file under the system temp dir, unique per test.
fn write_temp(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("activities-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("failed to write temp file");
    path
}

#[test]
fn test_generated_run_properties() {
    let track = generated_run(11, 3000.0);
    let activity = reduce(&track, &ActivityMetadata::default()).unwrap();
    let points = activity.points();

    assert_eq!(points.len(), track.len());

    for (derived, raw) in points.iter().zip(&track) {
        assert_eq!(derived.elapsed_seconds, raw.unix_time() - track[0].unix_time());
        assert_eq!(derived.lat, raw.lat);
        assert_eq!(derived.lon, raw.lon);
        assert_eq!(derived.elevation, raw.elevation);
    }

    for window in points.windows(2) {
        assert!(window[1].cumulative_distance >= window[0].cumulative_distance);
    }

    assert_eq!(activity.distance(), points.last().unwrap().cumulative_distance);
    assert_eq!(
        activity.duration_seconds(),
        activity.end_time() - activity.start_time()
    );
    assert!(activity.max_speed() >= activity.min_speed());
    assert!(activity.max_elevation() >= activity.min_elevation());
    assert!(activity.avg_speed().is_finite());
}

#[test]
fn test_runner_average_speed_is_plausible() {
    // a steady 5:00/km runner covers 12 km per hour, i.e. 12 000 m/h
    let track = ProceduralGenerator::new(5)
        .with_distance(2000.0)
        .with_pauses(0.0, 0.0, 0.0)
        .with_gps_jitter(0.0)
        .with_elevation(ElevationGenerator::new(5).with_height_scale(0.0))
        .generate(&RunnerProfile::steady(5.0), &mut seeded_rng(5));
    let activity = reduce(&track, &ActivityMetadata::default()).unwrap();

    assert!(
        (activity.avg_speed() - 12_000.0).abs() < 600.0,
        "avg speed {}",
        activity.avg_speed()
    );
}

#[test]
fn test_reduction_is_repeatable() {
    let track = generated_run(21, 1500.0);
    let metadata = ActivityMetadata {
        calories: 150,
        ..Default::default()
    };

    let first = reduce(&track, &metadata).unwrap();
    let second = reduce(&track, &metadata).unwrap();
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&LegacyActivity::from(&first)).unwrap();
    let second_json = serde_json::to_string(&LegacyActivity::from(&second)).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_start_time_override_on_generated_run() {
    let recorded_start = datetime!(2019-05-04 17:45 UTC);
    let track = ProceduralGenerator::new(31)
        .with_distance(1000.0)
        .with_start_time(recorded_start)
        .generate(&RunnerProfile::default(), &mut seeded_rng(31));
    let override_start = datetime!(2021-09-10 6:30 UTC);
    let metadata = ActivityMetadata {
        start_time: Some(override_start),
        ..Default::default()
    };

    let shifted = reduce(&track, &metadata).unwrap();
    let plain = reduce(&track, &ActivityMetadata::default()).unwrap();
    let raw_duration = track.last().unwrap().unix_time() - track[0].unix_time();

    assert_eq!(plain.start_time(), recorded_start.unix_timestamp());
    assert_eq!(shifted.start_time(), override_start.unix_timestamp());
    assert_eq!(shifted.end_time() - shifted.start_time(), raw_duration);
    assert_eq!(shifted.points(), plain.points());
}

#[test]
fn test_below_sea_level_extremes() {
    let track = ProceduralGenerator::new(8)
        .with_distance(800.0)
        .with_elevation(ElevationGenerator::depression(8))
        .generate(&RunnerProfile::default(), &mut seeded_rng(8));
    let activity = reduce(&track, &ActivityMetadata::default()).unwrap();

    let max = track.iter().map(|p| p.elevation).fold(f64::MIN, f64::max);
    let min = track.iter().map(|p| p.elevation).fold(f64::MAX, f64::min);
    assert!(activity.max_elevation() < 0.0);
    assert_eq!(activity.max_elevation(), max);
    assert_eq!(activity.min_elevation(), min);
}

#[test]
fn test_ride_near_antimeridian() {
    let track = ProceduralGenerator::for_region(Region::FIJI, 4)
        .with_distance(5000.0)
        .generate(&CyclistProfile::default(), &mut seeded_rng(4));
    let metadata = ActivityMetadata {
        sport_type: CyclistProfile::default().sport_type(),
        ..Default::default()
    };
    let activity = reduce(&track, &metadata).unwrap();

    assert_eq!(activity.sport_type(), 1);
    assert!(activity.distance() > 4000.0);
    assert!(activity.distance() < 8000.0);
}

#[test]
fn test_gpx_round_trip_through_parser() {
    let track = generated_run(41, 1200.0);
    let gpx = generate_gpx(&track, "Lunch Run");

    let parsed = parse_activity_file(FileType::Gpx, Bytes::from(gpx)).unwrap();
    assert_eq!(parsed.len(), track.len());

    let from_file = reduce(&parsed, &ActivityMetadata::default()).unwrap();
    let direct = reduce(&track, &ActivityMetadata::default()).unwrap();

    assert_eq!(from_file.duration_seconds(), direct.duration_seconds());
    for (a, b) in from_file.points().iter().zip(direct.points()) {
        assert_eq!(a.elapsed_seconds, b.elapsed_seconds);
    }
    let relative = (from_file.distance() - direct.distance()).abs() / direct.distance();
    assert!(relative < 1e-3, "distance drifted by {relative}");
}

#[test]
fn test_reduce_file_from_disk() {
    let track = generated_run(51, 600.0);
    let path = write_temp("run.gpx", &generate_gpx(&track, "Disk Run"));

    let metadata = ActivityMetadata {
        calories: 42,
        latitude_offset: 0.0013,
        longitude_offset: 0.0061,
        ..Default::default()
    };
    let activity = reduce_file(&path, &metadata, &TrackReducer::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(activity.points().len(), track.len());
    assert_eq!(activity.calories(), 42);
    assert_eq!(activity.latitude_offset(), 0.0013);
    assert_eq!(activity.longitude_offset(), 0.0061);
}

#[test]
fn test_reduce_file_reports_typed_errors() {
    let missing = std::env::temp_dir().join("activities-does-not-exist.gpx");
    let err = reduce_file(&missing, &ActivityMetadata::default(), &TrackReducer::default())
        .unwrap_err();
    assert!(matches!(err, activities::AppError::Io(_)));

    let single = vec![TrackPoint::new(40.0, 116.3, 50.0, datetime!(2016-03-01 8:00 UTC))];
    let path = write_temp("single.gpx", &generate_gpx(&single, "Single"));
    let err =
        reduce_file(&path, &ActivityMetadata::default(), &TrackReducer::default()).unwrap_err();
    assert!(matches!(
        err,
        activities::AppError::Reduce(ReduceError::DegenerateDuration { .. })
    ));

    let lenient = TrackReducer::new(
        ReduceOptions::default().with_zero_duration(ZeroDurationPolicy::ZeroSpeed),
    );
    let activity = reduce_file(&path, &ActivityMetadata::default(), &lenient).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(activity.distance(), 0.0);
    assert_eq!(activity.avg_speed(), 0.0);
}

#[test]
fn test_legacy_payload_round_trip() {
    let track = generated_run(61, 900.0);
    let activity = reduce(&track, &ActivityMetadata::default()).unwrap();

    let history: ReportHistory = std::iter::once(&activity).collect();
    let json = serde_json::to_string(&history).unwrap();
    let parsed: ReportHistory = serde_json::from_str(&json).unwrap();
    let legacy = &parsed.report_history[0];

    assert_eq!(legacy.sport_time, activity.duration_seconds());
    assert_eq!(legacy.start_time, activity.start_time());

    let decoded = legacy.points().unwrap();
    assert_eq!(decoded.len(), activity.points().len());
    for (decoded, original) in decoded.iter().zip(activity.points()) {
        assert_eq!(decoded.elapsed_seconds, original.elapsed_seconds);
        assert!((decoded.lat - original.lat).abs() < 1e-6);
        assert!((decoded.lon - original.lon).abs() < 1e-6);
        assert!((decoded.elevation - original.elevation).abs() < 1e-6);
        assert!((decoded.speed - original.speed).abs() < 1e-6);
        assert!((decoded.cumulative_distance - original.cumulative_distance).abs() < 1e-6);
    }
}
