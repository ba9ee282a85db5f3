// src/civilization/mod.rs
//! Цивилизация: территории фракций, поселения и дороги.
//!
//! Слой целиком отключаем: нулевые счётчики или пресет без цивилизации дают пустой слой.

pub mod roads;
pub mod settlement;
pub mod territory;

pub use roads::{Road, bresenham_wrap, connect_settlements, road_network};
pub use settlement::{Settlement, SettlementKind, SiteFields};
pub use territory::{Territory, assign_territory, faction_strength, place_faction_cores};

use crate::biome::Biome;
use crate::config::PlanetConfig;
use crate::grid::{GridPos, GridShape};
use crate::tables::Preset;

/// Верхние пределы числа фракций и поселений.
pub const MAX_FACTIONS: usize = 20;
pub const MAX_SETTLEMENTS: usize = 220;

#[derive(Debug, Clone, PartialEq)]
pub struct Civilization {
    pub faction_cores: Vec<GridPos>,
    pub faction_id: Vec<i32>,
    pub faction_strength: Vec<f32>,
    pub settlements: Vec<Settlement>,
    pub roads: Vec<Road>,
}

impl Civilization {
    pub fn empty(shape: GridShape) -> Self {
        Self {
            faction_cores: Vec::new(),
            faction_id: vec![-1; shape.len()],
            faction_strength: vec![0.0; shape.len()],
            settlements: Vec::new(),
            roads: Vec::new(),
        }
    }
}

/// Поля мира, нужные цивилизации.
#[derive(Debug, Clone, Copy)]
pub struct CivilizationInputs<'a> {
    pub elevation: &'a [f32],
    pub ocean: &'a [bool],
    pub ocean_threshold: f32,
    pub biome: &'a [Biome],
    pub moisture: &'a [f32],
    pub temperature: &'a [f32],
    pub coast_distance: &'a [u32],
    pub river: &'a [u8],
}

/// Сколько фракций пытаемся разместить: в мире без цивилизации вдвое меньше.
pub fn faction_target(preset: &Preset, faction_count: u32) -> usize {
    let target = if preset.has_civilization() {
        faction_count
    } else {
        faction_count / 2
    };
    (target as usize).min(MAX_FACTIONS)
}

/// Сколько поселений пытаемся разместить с учётом плотности пресета.
pub fn settlement_target(preset: &Preset, settlement_count: u32) -> usize {
    if !preset.has_civilization() {
        return 0;
    }
    let target = (settlement_count as f32 * preset.settlement_density).floor();
    (target as usize).min(MAX_SETTLEMENTS)
}

pub fn generate_civilization(
    shape: GridShape,
    config: &PlanetConfig,
    preset: &Preset,
    inputs: CivilizationInputs<'_>,
) -> Civilization {
    let seed = config.seed32();

    let cores = place_faction_cores(
        shape,
        seed,
        inputs.elevation,
        inputs.ocean,
        inputs.ocean_threshold,
        faction_target(preset, config.faction_count),
    );
    let territory = assign_territory(shape, &cores, inputs.ocean, inputs.biome);
    let strength = faction_strength(shape, &territory, inputs.ocean);
    tracing::debug!(factions = cores.len(), "faction territories assigned");

    let fields = SiteFields {
        elevation: inputs.elevation,
        ocean: inputs.ocean,
        ocean_threshold: inputs.ocean_threshold,
        moisture: inputs.moisture,
        temperature: inputs.temperature,
        coast_distance: inputs.coast_distance,
        river: inputs.river,
        faction_id: &territory.faction_id,
        faction_strength: &strength,
    };
    let settlements = settlement::place_settlements(
        shape,
        seed,
        &fields,
        settlement_target(preset, config.settlement_count),
        config.settlement_spacing,
    );
    let roads = connect_settlements(shape, &settlements);
    tracing::debug!(
        settlements = settlements.len(),
        roads = roads.len(),
        "settlements placed"
    );

    Civilization {
        faction_cores: cores,
        faction_id: territory.faction_id,
        faction_strength: strength,
        settlements,
        roads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(civ_level: i32, settlement_density: f32) -> Preset {
        Preset {
            name: None,
            civ_level,
            settlement_density,
            ruins_density: 0.25,
            hazards: Vec::new(),
            faction_style: "feudal".to_string(),
        }
    }

    #[test]
    fn targets_follow_the_preset() {
        assert_eq!(faction_target(&preset(1, 1.0), 9), 9);
        assert_eq!(faction_target(&preset(0, 1.0), 9), 4);
        assert_eq!(faction_target(&preset(1, 1.0), 0), 0);
        assert_eq!(faction_target(&preset(1, 1.0), 500), MAX_FACTIONS);

        assert_eq!(settlement_target(&preset(1, 1.5), 60), 90);
        assert_eq!(settlement_target(&preset(0, 1.5), 60), 0);
        assert_eq!(settlement_target(&preset(1, 1.0), 0), 0);
        assert_eq!(settlement_target(&preset(1, 10.0), 60), MAX_SETTLEMENTS);
    }

    #[test]
    fn zero_counts_give_an_empty_layer() {
        let shape = GridShape::new(32, 16);
        let n = shape.len();
        let elevation = vec![0.2; n];
        let ocean = vec![false; n];
        let biome = vec![Biome::Grassland; n];
        let field = vec![0.5; n];
        let coast = vec![3; n];
        let river = vec![0; n];
        let config = PlanetConfig {
            width: 32,
            height: 16,
            faction_count: 0,
            settlement_count: 0,
            ..PlanetConfig::default()
        };
        let inputs = CivilizationInputs {
            elevation: &elevation,
            ocean: &ocean,
            ocean_threshold: 0.0,
            biome: &biome,
            moisture: &field,
            temperature: &field,
            coast_distance: &coast,
            river: &river,
        };
        let civ = generate_civilization(shape, &config, &preset(1, 1.0), inputs);
        assert_eq!(civ, Civilization::empty(shape));
    }
}
