use serde::{Deserialize, Serialize};

/// Biome categories assigned by the classifier. `Waste` doubles as the
/// fallback when no table rule matches and as the volcanic overprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Waste,
    Desert,
    Grassland,
    Forest,
    Jungle,
    Taiga,
    Tundra,
    Mountain,
}

/// Per-cell water marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterKind {
    None,
    Ocean,
    /// Lava lake at a volcano mouth.
    Volcano,
}

/// The overworld grid: fixed `width × height` cells, one row-major vector
/// per scalar/categorical field. Dimensions never change mid-pipeline.
///
/// Field conventions:
///   - `height` ∈ roughly [0, 1]; volcanoes may push individual cells above 1.
///   - `erosion` starts at 1.0 and only decreases (lower = more eroded).
///   - `faults` is a normalized [0, 1] distance-to-fault proxy, starts at 1.0.
///   - `weathering` is scratch space for the weathering sub-pass, reset to 0
///     after each application.
///   - `faction` is 0 for unclaimed or a 1-based faction index.
#[derive(Debug, Clone)]
pub struct OverworldMap {
    pub width: usize,
    pub height_cells: usize,
    pub height: Vec<f32>,
    pub temperature: Vec<f32>,
    pub rainfall: Vec<f32>,
    pub erosion: Vec<f32>,
    pub faults: Vec<f32>,
    pub weathering: Vec<f32>,
    pub biome: Vec<Biome>,
    pub faction: Vec<u8>,
    pub water: Vec<WaterKind>,
}

impl OverworldMap {
    /// Allocate a fresh map with every field at its pipeline-start value.
    pub fn new(width: usize, height_cells: usize) -> Self {
        let n = width * height_cells;
        Self {
            width,
            height_cells,
            height: vec![0.0; n],
            temperature: vec![0.0; n],
            rainfall: vec![0.0; n],
            erosion: vec![1.0; n],
            faults: vec![1.0; n],
            weathering: vec![0.0; n],
            biome: vec![Biome::Waste; n],
            faction: vec![0; n],
            water: vec![WaterKind::None; n],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height_cells
    }

    #[inline]
    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        self.height[y * self.width + x]
    }

    /// Bilinear sample of an arbitrary row-major field at fractional
    /// coordinates, clamped to the grid. Used by the distortion passes.
    pub fn sample_field(field: &[f32], width: usize, height: usize, fx: f32, fy: f32) -> f32 {
        let fx = fx.clamp(0.0, (width - 1) as f32);
        let fy = fy.clamp(0.0, (height - 1) as f32);
        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let v00 = field[y0 * width + x0];
        let v10 = field[y0 * width + x1];
        let v01 = field[y1 * width + x0];
        let v11 = field[y1 * width + x1];

        v00 * (1.0 - tx) * (1.0 - ty)
            + v10 * tx * (1.0 - ty)
            + v01 * (1.0 - tx) * ty
            + v11 * tx * ty
    }

    /// Clone edge rows/columns from their interior neighbors, for every
    /// per-cell field. Run once after all stages to avoid boundary artifacts
    /// from the gradient and distortion passes.
    pub fn clone_edges(&mut self) {
        let w = self.width;
        let h = self.height_cells;
        if w < 2 || h < 2 {
            return;
        }

        fn clone_field_edges<T: Copy>(field: &mut [T], w: usize, h: usize) {
            for x in 0..w {
                field[x] = field[w + x];
                field[(h - 1) * w + x] = field[(h - 2) * w + x];
            }
            for y in 0..h {
                field[y * w] = field[y * w + 1];
                field[y * w + w - 1] = field[y * w + w - 2];
            }
        }

        clone_field_edges(&mut self.height, w, h);
        clone_field_edges(&mut self.temperature, w, h);
        clone_field_edges(&mut self.rainfall, w, h);
        clone_field_edges(&mut self.erosion, w, h);
        clone_field_edges(&mut self.faults, w, h);
        clone_field_edges(&mut self.weathering, w, h);
        clone_field_edges(&mut self.biome, w, h);
        clone_field_edges(&mut self.faction, w, h);
        clone_field_edges(&mut self.water, w, h);
    }

    pub fn min_height(&self) -> f32 {
        self.height.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.height.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }
}
