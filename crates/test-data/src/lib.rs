//! Synthetic GPS tracks for exercising the activity reducer.
//!
//! Tracks are generated procedurally from a seed, so tests can ask for a
//! realistic-looking run or ride and get the same points every time.
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let track = ProceduralGenerator::new(7)
//!     .with_distance(3000.0)
//!     .generate(&RunnerProfile::default(), &mut seeded_rng(7));
//! let gpx = generate_gpx(&track, "Morning Run");
//! ```

pub mod config;
pub mod gpx;
pub mod profiles;
pub mod sources;
pub mod terrain;

use rand::{SeedableRng, rngs::StdRng};

/// Deterministic RNG for reproducible tracks.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{BoundingBox, Region};
    pub use crate::gpx::generate_gpx;
    pub use crate::profiles::{
        AthleteProfile, CyclistProfile, RunnerProfile, sample_variance, speed_at_grade,
    };
    pub use crate::seeded_rng;
    pub use crate::sources::{ProceduralGenerator, TrackConfig};
    pub use crate::terrain::ElevationGenerator;
    pub use activities::TrackPoint;
}
