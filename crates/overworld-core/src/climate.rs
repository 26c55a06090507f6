//! Climate propagation: latitudinal temperature with smooth distortion, and
//! a per-row moisture-advection sweep for rainfall.

use rand::rngs::StdRng;
use rand::Rng;

use crate::map::OverworldMap;
use crate::noise::distort::distort_field;
use crate::settings::GenerationSettings;

/// Rain extracted per cell, as a fraction of carried moisture.
const RAIN_RATE: f32 = 0.017;
/// Rainfall written to every below-sea-level cell.
const OCEAN_RAINFALL: f32 = 0.5;
/// Upper bound on per-cell ocean moisture recharge.
const RECHARGE_MAX: f32 = 0.5;
/// Upper bound on per-cell evaporation returned to the accumulator.
const EVAPORATION_MAX: f32 = 0.01;
/// Distortion amplitude in cells for both climate fields.
const DISTORT_CELLS: f32 = 6.0;

/// Derive temperature and rainfall for the whole grid.
pub fn apply_climate(map: &mut OverworldMap, settings: &GenerationSettings, rng: &mut StdRng) {
    apply_temperature(map, settings, rng);
    apply_rainfall(map, settings, rng);
}

/// Temperature: linear in the normalized row position, scaled, smoothly
/// distorted, then clamped to [0, 1].
fn apply_temperature(map: &mut OverworldMap, settings: &GenerationSettings, rng: &mut StdRng) {
    let w = map.width;
    let h = map.height_cells;
    for y in 0..h {
        let latitude = y as f32 / (h - 1) as f32;
        let base = latitude * settings.temperature_scale;
        for x in 0..w {
            map.temperature[y * w + x] = base;
        }
    }

    let seed = rng.gen::<u32>();
    distort_field(&mut map.temperature, w, h, DISTORT_CELLS, 4.0, seed);

    for t in map.temperature.iter_mut() {
        *t = t.clamp(0.0, 1.0);
    }
}

/// Rainfall: a left-to-right moisture sweep per row.
///
/// The accumulator starts at `rainfall_scale * 10`. Ocean cells recharge it
/// (capped at `rainfall_scale * 20`) and receive a fixed rainfall constant;
/// land cells extract rain as a function of carried moisture and local
/// height, with a small random evaporation returned. The finished field is
/// smoothly distorted.
fn apply_rainfall(map: &mut OverworldMap, settings: &GenerationSettings, rng: &mut StdRng) {
    let w = map.width;
    let h = map.height_cells;
    let moisture_cap = settings.rainfall_scale * 20.0;

    for y in 0..h {
        let mut moisture = settings.rainfall_scale * 10.0;
        for x in 0..w {
            let i = y * w + x;
            let height = map.height[i];
            if height <= settings.sea_level {
                moisture = (moisture + rng.gen::<f32>() * RECHARGE_MAX).min(moisture_cap);
                map.rainfall[i] = OCEAN_RAINFALL;
            } else {
                let rain = moisture * RAIN_RATE * (0.25 + height);
                moisture = (moisture - rain).max(0.0);
                moisture += rng.gen::<f32>() * EVAPORATION_MAX;
                map.rainfall[i] = rain * settings.rainfall_scale * w as f32 * 0.01;
            }
        }
    }

    let seed = rng.gen::<u32>();
    distort_field(&mut map.rainfall, w, h, DISTORT_CELLS, 4.0, seed);
}
