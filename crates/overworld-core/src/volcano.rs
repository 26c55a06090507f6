//! Volcano placement: pick high-elevation points and stamp a radial bump,
//! a lava lake at the mouth, and a waste-biome apron.
//!
//! Chosen centers are returned to the caller and stored on the generation
//! run, never in process-wide state; a fresh run starts with an empty list.

use rand::rngs::StdRng;
use rand::Rng;

use crate::map::{Biome, OverworldMap, WaterKind};
use crate::settings::GenerationSettings;

/// Candidate points sampled per volcano.
const CANDIDATES: usize = 10;
/// Peak height added at the volcano center.
const BUMP_HEIGHT: f32 = 0.4;
/// Fraction of the radius marked as lava lake.
const LAKE_FRACTION: f32 = 0.25;
/// Fraction of the radius reclassified as waste.
const WASTE_FRACTION: f32 = 0.6;

/// Place `num_volcanoes` volcanoes and return their centers.
pub fn place_volcanoes(
    map: &mut OverworldMap,
    settings: &GenerationSettings,
    rng: &mut StdRng,
) -> Vec<(usize, usize)> {
    let mut centers = Vec::with_capacity(settings.num_volcanoes);
    for _ in 0..settings.num_volcanoes {
        let center = highest_candidate(map, rng);
        stamp(map, center, settings.volcano_radius);
        centers.push(center);
    }
    centers
}

/// Sample `CANDIDATES` random interior cells, keep the highest.
fn highest_candidate(map: &OverworldMap, rng: &mut StdRng) -> (usize, usize) {
    let mut best = (1usize, 1usize);
    let mut best_h = f32::NEG_INFINITY;
    for _ in 0..CANDIDATES {
        let x = rng.gen_range(1..map.width - 1);
        let y = rng.gen_range(1..map.height_cells - 1);
        let h = map.height_at(x, y);
        if h > best_h {
            best_h = h;
            best = (x, y);
        }
    }
    best
}

/// Raise height within `radius` by a sin falloff of radial distance; cells
/// very near the center become lava, near cells become waste. Heights at
/// the peak may exceed 1.0, which is the one place the unit range is
/// deliberately broken.
fn stamp(map: &mut OverworldMap, center: (usize, usize), radius: f32) {
    let (cx, cy) = (center.0 as f32, center.1 as f32);
    let r = radius.max(1.0);

    let x0 = (cx - r).floor().max(0.0) as usize;
    let x1 = ((cx + r).ceil() as usize).min(map.width - 1);
    let y0 = (cy - r).floor().max(0.0) as usize;
    let y1 = ((cy + r).ceil() as usize).min(map.height_cells - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d >= r {
                continue;
            }
            let i = y * map.width + x;
            let t = 1.0 - d / r;
            map.height[i] += BUMP_HEIGHT * (t * std::f32::consts::FRAC_PI_2).sin();
            if d < r * LAKE_FRACTION {
                map.water[i] = WaterKind::Volcano;
            }
            if d < r * WASTE_FRACTION {
                map.biome[i] = Biome::Waste;
            }
        }
    }
}
