/// Command-line generation driver: runs the full pipeline on a background
/// worker with console progress, then writes a JSON world summary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use overworld_core::map::{Biome, WaterKind};
use overworld_core::{GenerationRun, GenerationSettings};

#[derive(Parser, Debug)]
#[command(name = "worldgen", about = "Procedural overworld generator")]
struct Args {
    /// Path to a GenerationSettings JSON file; flags below override it.
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Where to write the world summary.
    #[arg(short, long, default_value = "world.json")]
    output: PathBuf,
}

#[derive(Serialize)]
struct FactionSummary {
    name: String,
    territory_size: usize,
    center: (f32, f32),
}

#[derive(Serialize)]
struct WorldSummary {
    settings: GenerationSettings,
    ocean_cells: usize,
    lava_cells: usize,
    biome_counts: Vec<(String, usize)>,
    factions: Vec<FactionSummary>,
    volcanoes: Vec<(usize, usize)>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("cannot parse {}", path.display()))?
        }
        None => GenerationSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }

    log::info!(
        "generating {}x{} world, seed {}",
        settings.width,
        settings.height,
        settings.seed
    );

    let mut run = GenerationRun::new(settings)?
        .with_preview(|snap| eprintln!("[{:>3.0}%] {}", snap.fraction * 100.0, snap.message));
    run.start();
    let result = run.join()?;

    let ocean_cells = result
        .map
        .water
        .iter()
        .filter(|&&w| w == WaterKind::Ocean)
        .count();
    let lava_cells = result
        .map
        .water
        .iter()
        .filter(|&&w| w == WaterKind::Volcano)
        .count();

    let mut biome_counts: Vec<(String, usize)> = Vec::new();
    for (biome, label) in [
        (Biome::Waste, "waste"),
        (Biome::Desert, "desert"),
        (Biome::Grassland, "grassland"),
        (Biome::Forest, "forest"),
        (Biome::Jungle, "jungle"),
        (Biome::Taiga, "taiga"),
        (Biome::Tundra, "tundra"),
        (Biome::Mountain, "mountain"),
    ] {
        let count = result.map.biome.iter().filter(|&&b| b == biome).count();
        biome_counts.push((label.to_owned(), count));
    }

    let summary = WorldSummary {
        settings: result.settings,
        ocean_cells,
        lava_cells,
        biome_counts,
        factions: result
            .factions
            .iter()
            .map(|f| FactionSummary {
                name: f.name.clone(),
                territory_size: f.territory_size,
                center: f.center,
            })
            .collect(),
        volcanoes: result.volcanoes,
    };

    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(&args.output, json)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
