//! Overworld generation core: a staged pipeline that synthesizes a 2D
//! height/climate/political map from layered noise, Voronoi fault lines,
//! raindrop erosion, a moisture sweep, biome classification, volcano
//! stamping, and faction territory growth.
//!
//! The library exposes three surfaces:
//!   - [`generate`] — run the whole pipeline synchronously.
//!   - [`GenerationRun`] — run it on a dedicated worker thread with a
//!     pollable progress snapshot and between-stage cancellation.
//!   - The per-stage functions in each module, unit-testable against
//!     fixed input grids.

pub mod biomes;
pub mod climate;
pub mod erosion;
pub mod error;
pub mod factions;
pub mod faults;
pub mod map;
pub mod noise;
pub mod pipeline;
pub mod run;
pub mod settings;
pub mod volcano;

pub use error::{GenError, SettingsError};
pub use factions::Faction;
pub use map::{Biome, OverworldMap, WaterKind};
pub use run::{generate, GenerationResult, GenerationRun, GenerationState, ProgressSnapshot};
pub use settings::GenerationSettings;
