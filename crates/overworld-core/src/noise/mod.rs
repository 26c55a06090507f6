//! Height field synthesis: a cached fBm lookup plus the composite that
//! re-derives the height grid from it.
//!
//! The lookup is sampled exactly once per run. Later stages (faults,
//! erosion, weathering) perturb either the lookup or the companion fields
//! and call [`apply_heights`] again, which is a cheap per-cell combine with
//! no noise resampling.

pub mod distort;
pub mod fbm;

use crate::map::OverworldMap;

/// Flat-field guard for min-max normalization.
const NORM_EPS: f32 = 1e-6;

/// Cached base-elevation noise, normalized to [0, 1], row-major.
pub struct NoiseLookup {
    pub values: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl NoiseLookup {
    /// Sample layered Perlin fBm at every cell and min-max normalize.
    /// Deterministic for a fixed seed.
    pub fn generate(seed: u64, width: usize, height: usize) -> Self {
        let fbm = fbm::Fbm::new((seed & 0xFFFF_FFFF) as u32 ^ 0x0042, 0.8, 4, 2.0);
        let base_freq = 4.0 / width.max(height) as f64;

        let mut values = vec![0.0f32; width * height];
        for y in 0..height {
            for x in 0..width {
                values[y * width + x] =
                    fbm.sample(x as f64 * base_freq, y as f64 * base_freq) as f32;
            }
        }
        normalize(&mut values);
        Self { values, width, height }
    }
}

/// Min-max normalize a field to [0, 1]; a numerically flat field is left
/// at all-zero instead of dividing by the degenerate range.
pub fn normalize(values: &mut [f32]) {
    let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if range < NORM_EPS {
        for v in values.iter_mut() {
            *v = 0.0;
        }
        return;
    }
    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
}

/// Re-derive the `Height` field from the cached lookup with the `Faults`
/// and `Erosion` fields folded in.
///
/// The composite keeps heights in [0, 1]: a squared-relief term sharpens
/// peaks, the fault field modulates up to 65% of the relief, and erosion
/// multiplies straight through (1.0 = untouched).
pub fn apply_heights(map: &mut OverworldMap, lookup: &NoiseLookup, scale: f32) {
    for i in 0..map.height.len() {
        let base = lookup.values[i];
        let relief = base * base * 0.6 + base * 0.4;
        let h = relief * (0.35 + 0.65 * map.faults[i]) * map.erosion[i] * scale;
        map.height[i] = h.clamp(0.0, 1.0);
    }
}
