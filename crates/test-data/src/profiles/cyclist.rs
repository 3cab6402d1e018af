//! Cyclist athletic profile.

use super::AthleteProfile;

/// Sport type code used for generated rides.
pub const SPORT_TYPE_CYCLING: i32 = 1;

/// Cyclist: ~28 km/h on the flat, heavily penalized by climbs.
#[derive(Debug, Clone)]
pub struct CyclistProfile {
    base_speed: f64,
    variance: f64,
}

impl Default for CyclistProfile {
    fn default() -> Self {
        Self {
            base_speed: 8.0,
            variance: 0.10,
        }
    }
}

impl CyclistProfile {
    /// Creates a cyclist with the given flat speed in km/h.
    pub fn with_speed(speed_kmh: f64) -> Self {
        Self {
            base_speed: speed_kmh / 3.6,
            ..Default::default()
        }
    }

    pub fn mountain_biker() -> Self {
        Self {
            base_speed: 5.0,
            variance: 0.15,
        }
    }
}

impl AthleteProfile for CyclistProfile {
    fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    fn grade_factor(&self, grade: f64) -> f64 {
        if grade >= 0.0 {
            (1.0 - grade * 25.0).max(0.15)
        } else {
            (1.0 - grade * 15.0).min(2.0)
        }
    }

    fn variance(&self) -> f64 {
        self.variance
    }

    fn sport_type(&self) -> i32 {
        SPORT_TYPE_CYCLING
    }
}
