//! Perlin noise-based elevation generation.

use noise::{NoiseFn, Perlin};

/// Generates elevation data from fractal Perlin noise.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters.
    base_elevation: f64,
    /// Amplitude of the variation around the base, in meters.
    height_scale: f64,
    /// Noise cycles per degree of latitude/longitude.
    frequency: f64,
    octaves: u32,
}

impl ElevationGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 50.0,
            height_scale: 20.0,
            frequency: 20.0,
            octaves: 3,
        }
    }

    /// Hilly terrain, a few hundred meters of relief.
    pub fn hills(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 400.0,
            height_scale: 300.0,
            frequency: 30.0,
            octaves: 4,
        }
    }

    /// Land below sea level.
    pub fn depression(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: -400.0,
            height_scale: 30.0,
            frequency: 20.0,
            octaves: 2,
        }
    }

    pub fn with_height_scale(mut self, scale: f64) -> Self {
        self.height_scale = scale;
        self
    }

    pub fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    /// Gets elevation at a given lat/lon coordinate.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            let noise_val = self.perlin.get([lat * frequency, lon * frequency]);
            total += noise_val * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = (total / max_amplitude).clamp(-1.0, 1.0);
        self.base_elevation + (normalized * self.height_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_consistency() {
        let elev_gen = ElevationGenerator::new(42);
        let elev1 = elev_gen.elevation_at(39.99, 116.30);
        let elev2 = elev_gen.elevation_at(39.99, 116.30);
        assert!((elev1 - elev2).abs() < 0.001);
    }

    #[test]
    fn test_elevation_range() {
        let elev_gen = ElevationGenerator::hills(42);
        for i in 0..50 {
            let elev = elev_gen.elevation_at(39.95 + i as f64 * 0.002, 116.15);
            assert!(elev >= elev_gen.base_elevation() - elev_gen.height_scale());
            assert!(elev <= elev_gen.base_elevation() + elev_gen.height_scale());
        }
    }

    #[test]
    fn test_depression_is_below_sea_level() {
        let elev_gen = ElevationGenerator::depression(7);
        assert!(elev_gen.elevation_at(31.5, 35.5) < 0.0);
    }
}
