//! Stage objects and the ordered pipeline runner.
//!
//! Each stage is an explicit object with a declared `apply` over the shared
//! world state, so stages are unit-testable in isolation and the run order
//! lives in exactly one place ([`default_stages`]). The runner reports a
//! monotonic progress fraction with a status message around every stage and
//! checks a cancellation flag between (not within) stages.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;

use crate::biomes::{apply_biomes, BiomeTable};
use crate::climate::apply_climate;
use crate::erosion::apply_erosion;
use crate::error::GenError;
use crate::factions::{apply_territory, finalize_factions, Faction};
use crate::faults::apply_faults;
use crate::map::OverworldMap;
use crate::noise::{apply_heights, NoiseLookup};
use crate::settings::GenerationSettings;
use crate::volcano::place_volcanoes;

/// Everything a generation run owns while stages execute. Allocated fresh
/// per run; nothing here survives into the next run.
pub struct WorldState {
    pub map: OverworldMap,
    pub lookup: NoiseLookup,
    pub factions: Vec<Faction>,
    pub volcanoes: Vec<(usize, usize)>,
}

impl WorldState {
    /// Allocate the map and sample the noise lookup for `settings.seed`.
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            map: OverworldMap::new(settings.width, settings.height),
            lookup: NoiseLookup::generate(settings.seed, settings.width, settings.height),
            factions: Vec::new(),
            volcanoes: Vec::new(),
        }
    }
}

/// One pipeline stage.
pub trait Stage {
    /// Human-readable status message shown while the stage runs.
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        rng: &mut StdRng,
    ) -> Result<(), GenError>;
}

/// Derive base heights from the cached noise lookup.
pub struct HeightStage;

impl Stage for HeightStage {
    fn name(&self) -> &'static str {
        "Shaping mountains"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        _settings: &GenerationSettings,
        _rng: &mut StdRng,
    ) -> Result<(), GenError> {
        apply_heights(&mut world.map, &world.lookup, 1.0);
        Ok(())
    }
}

/// Scatter fault lines and fold the normalized distance field into heights.
pub struct FaultStage;

impl Stage for FaultStage {
    fn name(&self) -> &'static str {
        "Tearing fault lines"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        rng: &mut StdRng,
    ) -> Result<(), GenError> {
        apply_faults(&mut world.map, settings, rng);
        apply_heights(&mut world.map, &world.lookup, 1.0);
        Ok(())
    }
}

/// Raindrop erosion traces plus the weathering sub-pass.
pub struct ErosionStage;

impl Stage for ErosionStage {
    fn name(&self) -> &'static str {
        "Raining and eroding"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        rng: &mut StdRng,
    ) -> Result<(), GenError> {
        apply_erosion(&mut world.map, &mut world.lookup, settings, rng);
        Ok(())
    }
}

/// Temperature and rainfall propagation.
pub struct ClimateStage;

impl Stage for ClimateStage {
    fn name(&self) -> &'static str {
        "Spreading weather"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        rng: &mut StdRng,
    ) -> Result<(), GenError> {
        apply_climate(&mut world.map, settings, rng);
        Ok(())
    }
}

/// Per-cell biome classification from the injectable rule table.
pub struct BiomeStage {
    pub table: BiomeTable,
}

impl Stage for BiomeStage {
    fn name(&self) -> &'static str {
        "Growing biomes"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        _rng: &mut StdRng,
    ) -> Result<(), GenError> {
        apply_biomes(&mut world.map, &self.table, settings.sea_level);
        Ok(())
    }
}

/// Volcano bumps, lava lakes, and waste aprons.
pub struct VolcanoStage;

impl Stage for VolcanoStage {
    fn name(&self) -> &'static str {
        "Raising volcanoes"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        rng: &mut StdRng,
    ) -> Result<(), GenError> {
        world.volcanoes = place_volcanoes(&mut world.map, settings, rng);
        Ok(())
    }
}

/// Faction seeding and territory growth.
pub struct TerritoryStage;

impl Stage for TerritoryStage {
    fn name(&self) -> &'static str {
        "Seeding civilizations"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        settings: &GenerationSettings,
        rng: &mut StdRng,
    ) -> Result<(), GenError> {
        world.factions = apply_territory(&mut world.map, settings, rng);
        Ok(())
    }
}

/// Clone edge rows/columns from interior neighbors across every field.
/// The clone copies interior faction values onto the edges, so the faction
/// accounting is recomputed afterwards to keep sizes equal to the claimed
/// cell count on the finished grid.
pub struct FinalizeStage;

impl Stage for FinalizeStage {
    fn name(&self) -> &'static str {
        "Smoothing the borders"
    }

    fn apply(
        &self,
        world: &mut WorldState,
        _settings: &GenerationSettings,
        _rng: &mut StdRng,
    ) -> Result<(), GenError> {
        world.map.clone_edges();
        finalize_factions(&world.map, &mut world.factions);
        Ok(())
    }
}

/// The canonical stage order. Each stage's inputs are produced by the
/// stages before it; reordering is not supported.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(HeightStage),
        Box::new(FaultStage),
        Box::new(ErosionStage),
        Box::new(ClimateStage),
        Box::new(BiomeStage { table: BiomeTable::default() }),
        Box::new(VolcanoStage),
        Box::new(TerritoryStage),
        Box::new(FinalizeStage),
    ]
}

/// Execute `stages` strictly in order.
///
/// `progress` receives `(fraction, message)` before each stage and a final
/// `(1.0, "Done")`; fractions are monotonically non-decreasing. `cancel`
/// is checked between stages only.
pub fn run_pipeline(
    world: &mut WorldState,
    settings: &GenerationSettings,
    rng: &mut StdRng,
    stages: &[Box<dyn Stage>],
    progress: &mut dyn FnMut(f32, &str),
    cancel: &AtomicBool,
) -> Result<(), GenError> {
    let total = stages.len().max(1);
    for (i, stage) in stages.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            log::info!("generation cancelled before stage '{}'", stage.name());
            return Err(GenError::Cancelled);
        }
        progress(i as f32 / total as f32, stage.name());
        log::debug!("stage {}/{}: {}", i + 1, total, stage.name());
        stage.apply(world, settings, rng)?;
    }
    progress(1.0, "Done");
    Ok(())
}
