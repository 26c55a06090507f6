use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// All inputs to a generation run. Immutable once a run starts; a
/// "regenerate" action clones this with a fresh seed rather than mutating
/// a running configuration.
///
/// Counts and scale defaults are tuned for a few-hundred-cells-per-side
/// overworld; they are content values, not algorithmic contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub width: usize,
    pub height: usize,
    pub seed: u64,

    /// Number of Voronoi fault lines scattered across the map.
    pub num_faults: usize,
    /// If the normalized fault field's mean falls below 0.5, invert it so
    /// faults read as ridges rather than valleys. Heuristic tie-break kept
    /// configurable rather than baked in.
    pub invert_faults_below_mean: bool,

    /// Number of raindrop erosion traces.
    pub num_rains: usize,
    /// Candidate cells sampled per raindrop; the highest becomes the origin.
    pub num_rain_samples: usize,
    /// Maximum descent steps per raindrop trace.
    pub rain_length: usize,
    /// Multiplicative erosion blend rate per visited cell (< 1.0).
    pub erosion_rate: f32,

    pub num_volcanoes: usize,
    /// Volcano bump radius in cells.
    pub volcano_radius: f32,

    pub num_civilizations: usize,
    /// Fixed number of territory growth sweeps.
    pub growth_iterations: usize,

    pub rainfall_scale: f32,
    pub temperature_scale: f32,
    /// Height threshold below which a cell is water for climate, erosion
    /// termination, and territory seeding.
    pub sea_level: f32,

    /// Colony spawn hint: side length in cells of the intended start area.
    pub spawn_size: usize,
    /// Colony spawn hint: preferred map coordinate, if the player picked one.
    pub spawn_point: Option<(usize, usize)>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: 0,
            num_faults: 3,
            invert_faults_below_mean: true,
            num_rains: 5000,
            num_rain_samples: 10,
            rain_length: 250,
            erosion_rate: 0.9,
            num_volcanoes: 3,
            volcano_radius: 9.0,
            num_civilizations: 5,
            growth_iterations: 20,
            rainfall_scale: 1.0,
            temperature_scale: 1.0,
            sea_level: 0.17,
            spawn_size: 3,
            spawn_point: None,
        }
    }
}

impl GenerationSettings {
    /// Fail-fast validation, run synchronously before the worker thread
    /// starts. Sampling exhaustion and numerical degeneracies are handled
    /// inside the pipeline; only outright misconfiguration is rejected here.
    pub fn validate(&self) -> Result<(), SettingsError> {
        // Interior sampling and the edge-cloning pass need a few cells of
        // margin on every side.
        if self.width < 8 || self.height < 8 {
            return Err(SettingsError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.num_civilizations == 0 {
            return Err(SettingsError::NoCivilizations);
        }
        if self.num_civilizations > u8::MAX as usize {
            return Err(SettingsError::TooManyCivilizations(self.num_civilizations));
        }
        if !(0.0..1.0).contains(&self.erosion_rate) {
            return Err(SettingsError::BadErosionRate(self.erosion_rate));
        }
        if !self.sea_level.is_finite() || self.sea_level < 0.0 {
            return Err(SettingsError::BadSeaLevel(self.sea_level));
        }
        Ok(())
    }

    /// Clone for a regenerate action: identical tuning, fresh seed.
    pub fn reseeded(&self, seed: u64) -> Self {
        Self { seed, ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(GenerationSettings::default().validate().is_ok());
    }

    #[test]
    fn tiny_dimensions_rejected() {
        let s = GenerationSettings { width: 0, ..Default::default() };
        assert!(s.validate().is_err());
        let s = GenerationSettings { height: 7, ..Default::default() };
        assert!(s.validate().is_err());
        let s = GenerationSettings { width: 8, height: 8, ..Default::default() };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn zero_civilizations_rejected() {
        let s = GenerationSettings { num_civilizations: 0, ..Default::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn erosion_rate_must_stay_below_one() {
        let s = GenerationSettings { erosion_rate: 1.0, ..Default::default() };
        assert!(s.validate().is_err());
        let s = GenerationSettings { erosion_rate: -0.1, ..Default::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn reseeded_changes_only_the_seed() {
        let s = GenerationSettings { seed: 1, num_faults: 7, ..Default::default() };
        let r = s.reseeded(99);
        assert_eq!(r.seed, 99);
        assert_eq!(r.num_faults, 7);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let s = GenerationSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: GenerationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, s.width);
        assert_eq!(back.sea_level, s.sea_level);
    }
}
