//! Biome classification: a pure per-cell lookup from (temperature,
//! rainfall, height) into a biome category.
//!
//! The thresholds are content-tuning values, not algorithmic contract, so
//! the rule table is injectable (and serde-loadable) rather than hardcoded;
//! `BiomeTable::default()` ships the stock tuning.

use serde::{Deserialize, Serialize};

use crate::map::{Biome, OverworldMap, WaterKind};

fn neg_inf() -> f32 {
    f32::NEG_INFINITY
}

fn pos_inf() -> f32 {
    f32::INFINITY
}

/// One classification rule: a box in (temperature, rainfall, height) space.
/// Omitted bounds default to ±infinity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeRule {
    pub biome: Biome,
    #[serde(default = "neg_inf")]
    pub min_temperature: f32,
    #[serde(default = "pos_inf")]
    pub max_temperature: f32,
    #[serde(default = "neg_inf")]
    pub min_rainfall: f32,
    #[serde(default = "pos_inf")]
    pub max_rainfall: f32,
    #[serde(default = "neg_inf")]
    pub min_height: f32,
    #[serde(default = "pos_inf")]
    pub max_height: f32,
}

impl BiomeRule {
    fn any(biome: Biome) -> Self {
        Self {
            biome,
            min_temperature: f32::NEG_INFINITY,
            max_temperature: f32::INFINITY,
            min_rainfall: f32::NEG_INFINITY,
            max_rainfall: f32::INFINITY,
            min_height: f32::NEG_INFINITY,
            max_height: f32::INFINITY,
        }
    }

    fn matches(&self, temperature: f32, rainfall: f32, height: f32) -> bool {
        temperature >= self.min_temperature
            && temperature < self.max_temperature
            && rainfall >= self.min_rainfall
            && rainfall < self.max_rainfall
            && height >= self.min_height
            && height < self.max_height
    }
}

/// Ordered rule table; the first matching rule wins, `fallback` catches the
/// rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeTable {
    pub rules: Vec<BiomeRule>,
    pub fallback: Biome,
}

impl Default for BiomeTable {
    fn default() -> Self {
        let rules = vec![
            BiomeRule { min_height: 0.70, ..BiomeRule::any(Biome::Mountain) },
            BiomeRule { max_temperature: 0.15, ..BiomeRule::any(Biome::Tundra) },
            BiomeRule {
                max_temperature: 0.35,
                min_rainfall: 0.10,
                ..BiomeRule::any(Biome::Taiga)
            },
            // Deserts still see trace rainfall; cells with effectively none
            // fall through to the waste fallback.
            BiomeRule {
                min_temperature: 0.40,
                min_rainfall: 0.005,
                max_rainfall: 0.05,
                ..BiomeRule::any(Biome::Desert)
            },
            BiomeRule {
                min_temperature: 0.70,
                min_rainfall: 0.30,
                ..BiomeRule::any(Biome::Jungle)
            },
            BiomeRule { min_rainfall: 0.20, ..BiomeRule::any(Biome::Forest) },
            BiomeRule { min_rainfall: 0.02, ..BiomeRule::any(Biome::Grassland) },
        ];
        Self { rules, fallback: Biome::Waste }
    }
}

impl BiomeTable {
    /// Pure classification of one cell.
    pub fn classify(&self, temperature: f32, rainfall: f32, height: f32) -> Biome {
        self.rules
            .iter()
            .find(|r| r.matches(temperature, rainfall, height))
            .map(|r| r.biome)
            .unwrap_or(self.fallback)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Classify every cell. Cells at or below sea level get the ocean marker
/// instead of a land biome.
pub fn apply_biomes(map: &mut OverworldMap, table: &BiomeTable, sea_level: f32) {
    for i in 0..map.biome.len() {
        if map.height[i] <= sea_level {
            map.water[i] = WaterKind::Ocean;
        } else {
            map.biome[i] = table.classify(map.temperature[i], map.rainfall[i], map.height[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_obvious_cases() {
        let t = BiomeTable::default();
        assert_eq!(t.classify(0.5, 0.3, 0.9), Biome::Mountain);
        assert_eq!(t.classify(0.05, 0.3, 0.4), Biome::Tundra);
        assert_eq!(t.classify(0.25, 0.3, 0.4), Biome::Taiga);
        assert_eq!(t.classify(0.8, 0.01, 0.4), Biome::Desert);
        assert_eq!(t.classify(0.9, 0.5, 0.4), Biome::Jungle);
        assert_eq!(t.classify(0.5, 0.25, 0.4), Biome::Forest);
        assert_eq!(t.classify(0.5, 0.05, 0.4), Biome::Grassland);
        assert_eq!(t.classify(0.5, 0.0, 0.4), Biome::Waste);
    }

    #[test]
    fn bone_dry_cells_are_waste_regardless_of_heat() {
        // Zero rainfall sits below the desert floor, so even hot cells fall
        // through to the fallback.
        let t = BiomeTable::default();
        assert_eq!(t.classify(0.8, 0.0, 0.4), Biome::Waste);
        assert_eq!(t.classify(0.8, 0.004, 0.4), Biome::Waste);
        assert_eq!(t.classify(0.8, 0.01, 0.4), Biome::Desert);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        // Mountain height beats every climate combination.
        let t = BiomeTable::default();
        assert_eq!(t.classify(0.9, 0.9, 0.95), Biome::Mountain);
        assert_eq!(t.classify(0.0, 0.0, 0.95), Biome::Mountain);
    }

    #[test]
    fn table_loads_from_json_with_defaulted_bounds() {
        let json = r#"{
            "rules": [
                { "biome": "Desert", "max_rainfall": 0.1 }
            ],
            "fallback": "Grassland"
        }"#;
        let t = BiomeTable::from_json(json).unwrap();
        assert_eq!(t.classify(0.5, 0.05, 0.5), Biome::Desert);
        assert_eq!(t.classify(0.5, 0.5, 0.5), Biome::Grassland);
    }

    #[test]
    fn apply_biomes_marks_ocean_below_sea_level() {
        let mut map = OverworldMap::new(8, 8);
        for (i, h) in map.height.iter_mut().enumerate() {
            *h = if i % 2 == 0 { 0.1 } else { 0.5 };
        }
        apply_biomes(&mut map, &BiomeTable::default(), 0.17);
        for i in 0..map.height.len() {
            if i % 2 == 0 {
                assert_eq!(map.water[i], WaterKind::Ocean);
            } else {
                assert_eq!(map.water[i], WaterKind::None);
            }
        }
    }
}
