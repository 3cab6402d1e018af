//! Runner athletic profile.

use activities::models::SPORT_TYPE_RUN;

use super::AthleteProfile;

/// Recreational runner: ~5:00/km on the flat, ~15% slower per 1% climb.
#[derive(Debug, Clone)]
pub struct RunnerProfile {
    base_speed: f64,
    variance: f64,
}

impl Default for RunnerProfile {
    fn default() -> Self {
        Self {
            base_speed: 3.5,
            variance: 0.08,
        }
    }
}

impl RunnerProfile {
    /// Creates a runner with the given base pace in minutes per kilometer.
    pub fn with_pace(pace_min_per_km: f64) -> Self {
        Self {
            base_speed: 1000.0 / (pace_min_per_km * 60.0),
            ..Default::default()
        }
    }

    /// Runner with no leg-to-leg speed variation.
    pub fn steady(pace_min_per_km: f64) -> Self {
        Self {
            variance: 0.0,
            ..Self::with_pace(pace_min_per_km)
        }
    }
}

impl AthleteProfile for RunnerProfile {
    fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    fn grade_factor(&self, grade: f64) -> f64 {
        if grade >= 0.0 {
            (1.0 - grade * 15.0).max(0.2)
        } else {
            (1.0 - grade * 8.0).min(1.5)
        }
    }

    fn variance(&self) -> f64 {
        self.variance
    }

    fn sport_type(&self) -> i32 {
        SPORT_TYPE_RUN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_conversion() {
        let profile = RunnerProfile::with_pace(5.0);
        assert!((profile.base_speed_mps() - 1000.0 / 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_grade_factors() {
        let profile = RunnerProfile::default();
        assert!((profile.grade_factor(0.0) - 1.0).abs() < 0.01);
        assert!(profile.grade_factor(0.05) < 1.0);
        assert!(profile.grade_factor(-0.05) > 1.0);
    }
}
