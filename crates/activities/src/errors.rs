use thiserror::Error;
use tracing::error;

use crate::file_parsers::ParseError;

/// Reasons a single track point is rejected by the reducer.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PointDefect {
    #[error("latitude is not finite ({0})")]
    NonFiniteLatitude(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude is not finite ({0})")]
    NonFiniteLongitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("elevation is not finite ({0})")]
    NonFiniteElevation(f64),

    #[error("timestamp goes backwards: elapsed {elapsed}s after {previous_elapsed}s")]
    TimestampRegression { previous_elapsed: i64, elapsed: i64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReduceError {
    #[error("track contains no points")]
    EmptyTrack,

    #[error("track spans {duration_seconds}s, average speed is undefined")]
    DegenerateDuration { duration_seconds: i64 },

    #[error("invalid track point at index {index}: {defect}")]
    InvalidPoint { index: usize, defect: PointDefect },

    #[error("{field} is not finite ({value})")]
    InvalidOffset { field: &'static str, value: f64 },
}

/// Failures of file-level operations: reading, parsing and reducing a track file.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Reduce error: {0}")]
    Reduce(#[from] ReduceError),
}

impl AppError {
    /// Logs the error at the level matching its cause and hands it back.
    pub fn logged(self, source: &str) -> Self {
        match &self {
            AppError::Io(e) => error!("{source}: IO error: {e}"),
            AppError::Parse(e) => error!("{source}: {e}"),
            AppError::Reduce(e) => error!("{source}: {e}"),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_point_display_names_index_and_defect() {
        let err = ReduceError::InvalidPoint {
            index: 3,
            defect: PointDefect::LatitudeOutOfRange(91.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("index 3"));
        assert!(msg.contains("91"));
    }

    #[test]
    fn test_reduce_error_converts_into_app_error() {
        let err: AppError = ReduceError::EmptyTrack.into();
        assert!(matches!(err, AppError::Reduce(ReduceError::EmptyTrack)));
        assert_eq!(err.to_string(), "Reduce error: track contains no points");
    }
}
