//! Athletic performance profiles.
//!
//! A profile turns terrain grade into a moving speed, which the track
//! generator uses to space timestamps.

mod cyclist;
mod runner;

pub use cyclist::CyclistProfile;
pub use runner::RunnerProfile;

use rand_distr::{Distribution, Normal};

pub trait AthleteProfile: Send + Sync {
    /// Base speed on flat terrain in meters per second.
    fn base_speed_mps(&self) -> f64;

    /// Speed multiplier for a grade expressed as a fraction (0.05 = 5%).
    fn grade_factor(&self, grade: f64) -> f64;

    /// Coefficient of variation of speed between legs.
    fn variance(&self) -> f64;

    /// Sport type code reported with the activity.
    fn sport_type(&self) -> i32;
}

pub fn speed_at_grade(profile: &dyn AthleteProfile, grade: f64, variance_factor: f64) -> f64 {
    let target = profile.base_speed_mps() * profile.grade_factor(grade);
    // never stop entirely
    (target * variance_factor).max(0.5)
}

/// Samples a speed multiplier around 1.0.
pub fn sample_variance(profile: &dyn AthleteProfile, rng: &mut impl rand::Rng) -> f64 {
    match Normal::new(1.0, profile.variance()) {
        Ok(normal) if profile.variance() > 0.0 => normal.sample(rng).clamp(0.7, 1.4),
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng;

    #[test]
    fn test_speed_has_floor() {
        let profile = RunnerProfile::default();
        assert_eq!(speed_at_grade(&profile, 1.0, 0.7), 0.5);
    }

    #[test]
    fn test_sample_variance_is_clamped() {
        let profile = CyclistProfile::mountain_biker();
        let mut rng = seeded_rng(3);
        for _ in 0..200 {
            let v = sample_variance(&profile, &mut rng);
            assert!((0.7..=1.4).contains(&v));
        }
    }
}
