//! Faction seeding and territory growth: randomized, elevation-biased
//! flood fill from per-faction start points, finalized into centroids and
//! territory sizes.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::map::{OverworldMap, WaterKind};
use crate::settings::GenerationSettings;

/// Attempts per faction to find a land cell before giving up.
const SEED_RETRY_BUDGET: usize = 100;

/// Stock race names, cycled when more factions are requested.
const NAMES: [&str; 8] = [
    "Dwarves", "Goblins", "Elves", "Men", "Molemen", "Trolls", "Gnomes", "Kobolds",
];

/// Stock territory colors, cycled alongside the names.
const COLORS: [[u8; 3]; 8] = [
    [178, 34, 34],
    [46, 139, 87],
    [65, 105, 225],
    [218, 165, 32],
    [139, 69, 19],
    [72, 61, 139],
    [0, 139, 139],
    [199, 21, 133],
];

/// One territory record. `id` is the 1-based value written into the map's
/// faction field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    pub id: u8,
    pub name: String,
    pub color: [u8; 3],
    /// `None` when the seeding retry budget ran out (all-water maps).
    pub start: Option<(usize, usize)>,
    /// Mean coordinate of claimed cells; for zero-territory factions this
    /// stays at the seed point (or the origin when unseeded).
    pub center: (f32, f32),
    pub territory_size: usize,
}

/// Seed, grow, and finalize all factions.
pub fn apply_territory(
    map: &mut OverworldMap,
    settings: &GenerationSettings,
    rng: &mut StdRng,
) -> Vec<Faction> {
    let mut factions = seed_factions(map, settings, rng);
    grow_territories(map, settings, rng);
    finalize_factions(map, &mut factions);
    factions
}

/// Rejection-sample a land start cell for each faction. Exhausting the
/// retry budget is non-fatal: the faction simply stays unseeded.
pub fn seed_factions(
    map: &mut OverworldMap,
    settings: &GenerationSettings,
    rng: &mut StdRng,
) -> Vec<Faction> {
    let mut factions = Vec::with_capacity(settings.num_civilizations);
    for i in 0..settings.num_civilizations {
        let id = (i + 1) as u8;
        let mut start = None;
        for _ in 0..SEED_RETRY_BUDGET {
            let x = rng.gen_range(1..map.width - 1);
            let y = rng.gen_range(1..map.height_cells - 1);
            let cell = map.idx(x, y);
            if map.height[cell] > settings.sea_level && map.faction[cell] == 0 {
                map.faction[cell] = id;
                start = Some((x, y));
                break;
            }
        }
        factions.push(Faction {
            id,
            name: NAMES[i % NAMES.len()].to_string(),
            color: COLORS[i % COLORS.len()],
            start,
            center: start.map_or((0.0, 0.0), |(x, y)| (x as f32, y as f32)),
            territory_size: 0,
        });
    }
    factions
}

/// Grow territories for a fixed number of sweeps. Each sweep scans every
/// interior cell; a claimed, non-water cell tries to claim its lowest
/// unclaimed above-sea 4-neighbor, succeeding with probability inversely
/// related to that neighbor's height (low ground spreads fastest).
pub fn grow_territories(map: &mut OverworldMap, settings: &GenerationSettings, rng: &mut StdRng) {
    let w = map.width;
    let h = map.height_cells;

    for _ in 0..settings.growth_iterations {
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = y * w + x;
                let owner = map.faction[i];
                if owner == 0 || map.water[i] != WaterKind::None {
                    continue;
                }

                let neighbors = [i - 1, i + 1, i - w, i + w];
                let mut best: Option<(usize, f32)> = None;
                for &n in &neighbors {
                    if map.faction[n] != 0 {
                        continue;
                    }
                    let nh = map.height[n];
                    if nh <= settings.sea_level {
                        continue;
                    }
                    if best.map_or(true, |(_, bh)| nh < bh) {
                        best = Some((n, nh));
                    }
                }

                if let Some((n, nh)) = best {
                    if rng.gen::<f32>() < (1.0 - nh).clamp(0.0, 1.0) {
                        map.faction[n] = owner;
                    }
                }
            }
        }
    }
}

/// Compute each faction's centroid and territory size from the final grid.
pub fn finalize_factions(map: &OverworldMap, factions: &mut [Faction]) {
    let mut sums = vec![(0.0f64, 0.0f64, 0usize); factions.len()];
    for y in 0..map.height_cells {
        for x in 0..map.width {
            let f = map.faction[y * map.width + x];
            if f == 0 {
                continue;
            }
            let slot = &mut sums[(f - 1) as usize];
            slot.0 += x as f64;
            slot.1 += y as f64;
            slot.2 += 1;
        }
    }
    for (faction, &(sx, sy, count)) in factions.iter_mut().zip(sums.iter()) {
        faction.territory_size = count;
        if count > 0 {
            faction.center = ((sx / count as f64) as f32, (sy / count as f64) as f32);
        }
        // count == 0: keep the seed centroid (documented edge case).
    }
}
