//! Smooth domain-warp distortion for scalar fields.
//!
//! Each cell is re-sampled at a Perlin-offset coordinate, breaking up the
//! visibly straight lines left by the fault scatter and the row-wise climate
//! sweeps. The offset lookup is smooth, so the distorted field stays
//! continuous and within the original value range.
use noise::{NoiseFn, Perlin};

use crate::map::OverworldMap;

/// Distort `field` in place by bilinear re-sampling at Perlin-warped
/// coordinates.
///
/// * `amount`    — maximum offset in cells (typ. 5–15 for a 512-wide map).
/// * `frequency` — offset-noise cycles across the longer axis (typ. 3–6).
/// * `seed`      — warp Perlins use `seed ^ constants`, decorrelated per axis.
pub fn distort_field(
    field: &mut Vec<f32>,
    width: usize,
    height: usize,
    amount: f32,
    frequency: f32,
    seed: u32,
) {
    if amount.abs() < 1e-9 || width < 2 || height < 2 {
        return;
    }

    let px = Perlin::new(seed ^ 0x0001);
    let py = Perlin::new(seed ^ 0x0002);
    let freq = frequency as f64 / width.max(height) as f64;

    let mut out = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let nx = x as f64 * freq;
            let ny = y as f64 * freq;
            // Decorrelated x/y offsets.
            let dx = amount * px.get([nx, ny]) as f32;
            let dy = amount * py.get([nx + 5.2, ny + 1.3]) as f32;
            out[y * width + x] = OverworldMap::sample_field(
                field,
                width,
                height,
                x as f32 + dx,
                y as f32 + dy,
            );
        }
    }
    *field = out;
}
