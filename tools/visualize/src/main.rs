//! Diagnostic visualizer — writes four PNG debug images to data/debug/.
//! Not part of the main pipeline; no tests, no clippy target.

use std::fs;
use std::path::Path;

use overworld_core::map::{Biome, OverworldMap, WaterKind};
use overworld_core::{generate, GenerationSettings};

const W: usize = 512;
const H: usize = 512;
const SEED: u64 = 42;

// ── Colour helpers ────────────────────────────────────────────────────────────

/// Biome → distinct RGB colour.
fn biome_color(biome: Biome) -> [u8; 3] {
    match biome {
        Biome::Waste     => [120, 110, 100], // ash gray
        Biome::Desert    => [230, 210, 150], // sand
        Biome::Grassland => [140, 190,  90], // light green
        Biome::Forest    => [ 50, 130,  60], // green
        Biome::Jungle    => [ 20, 100,  40], // deep green
        Biome::Taiga     => [ 90, 130, 110], // muted teal
        Biome::Tundra    => [200, 210, 215], // pale gray
        Biome::Mountain  => [150, 140, 130], // rock
    }
}

/// Rainfall → blue heatmap: dry = white, wet = deep blue.
fn rain_to_rgb(rain: f32, max_rain: f32) -> [u8; 3] {
    let t = (rain / max_rain.max(1e-6)).clamp(0.0, 1.0);
    let lo = (255.0 * (1.0 - t)) as u8;
    let b = (255.0 - 75.0 * t) as u8;
    [lo, lo, b]
}

/// Height [0, 1] → grayscale (0 = black, 1 = white).
fn gray(v: f32) -> [u8; 3] {
    let c = (v.clamp(0.0, 1.0) * 255.0) as u8;
    [c, c, c]
}

fn water_color(kind: WaterKind, height: f32) -> Option<[u8; 3]> {
    match kind {
        WaterKind::None => None,
        WaterKind::Ocean => {
            let depth = (1.0 - height * 4.0).clamp(0.3, 1.0);
            Some([(30.0 * depth) as u8, (60.0 * depth) as u8, (180.0 * depth) as u8])
        }
        WaterKind::Volcano => Some([230, 70, 20]), // lava
    }
}

fn save_image<F>(map: &OverworldMap, path: &Path, mut pixel: F)
where
    F: FnMut(usize, usize) -> [u8; 3],
{
    let mut img = image::RgbImage::new(map.width as u32, map.height_cells as u32);
    for y in 0..map.height_cells {
        for x in 0..map.width {
            let [r, g, b] = pixel(x, y);
            img.put_pixel(x as u32, y as u32, image::Rgb([r, g, b]));
        }
    }
    img.save(path)
        .unwrap_or_else(|e| panic!("failed to save {}: {e}", path.display()));
    println!("Wrote {}", path.display());
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let settings = GenerationSettings {
        width: W,
        height: H,
        seed: SEED,
        ..Default::default()
    };

    println!("Generating overworld ({W}×{H}, seed {SEED})…");
    let result = generate(&settings).expect("generation failed");
    let map = &result.map;

    let out_dir = Path::new("data/debug");
    fs::create_dir_all(out_dir).expect("cannot create data/debug/");

    // ── 1. height.png ────────────────────────────────────────────────────────
    save_image(map, &out_dir.join("height.png"), |x, y| {
        gray(map.height_at(x, y))
    });

    // ── 2. biomes.png (water overrides the biome colour) ─────────────────────
    save_image(map, &out_dir.join("biomes.png"), |x, y| {
        let i = map.idx(x, y);
        water_color(map.water[i], map.height[i]).unwrap_or_else(|| biome_color(map.biome[i]))
    });

    // ── 3. rainfall.png (blue heatmap) ───────────────────────────────────────
    let max_rain = map.rainfall.iter().cloned().fold(0.0f32, f32::max);
    save_image(map, &out_dir.join("rainfall.png"), |x, y| {
        rain_to_rgb(map.rainfall[map.idx(x, y)], max_rain)
    });

    // ── 4. factions.png (territory colours over a height shade) ──────────────
    save_image(map, &out_dir.join("factions.png"), |x, y| {
        let i = map.idx(x, y);
        let id = map.faction[i];
        if id > 0 {
            if let Some(faction) = result.factions.get(id as usize - 1) {
                return faction.color;
            }
        }
        if map.water[i] == WaterKind::Ocean {
            [30, 60, 140]
        } else {
            gray(map.height[i] * 0.6 + 0.2)
        }
    });

    for faction in &result.factions {
        println!(
            "  {} — {} cells, center ({:.0}, {:.0})",
            faction.name, faction.territory_size, faction.center.0, faction.center.1
        );
    }
    println!("Done.");
}
