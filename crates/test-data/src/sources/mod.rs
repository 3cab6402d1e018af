//! Track sources.
//!
//! - [`ProceduralGenerator`]: synthetic tracks with configurable parameters

mod procedural;

pub use procedural::{ProceduralGenerator, TrackConfig};
