use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::grid::{GridPos, GridShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Ocean,
    SeaIce,
    SnowMountain,
    Mountain,
    Highland,
    Marsh,
    Swamp,
    ColdDesert,
    Desert,
    Tundra,
    Taiga,
    Steppe,
    TemperateForest,
    Grassland,
    TropicalRainforest,
    Savanna,
    Badlands,
    River,
}

impl Biome {
    pub const ALL: [Biome; 18] = [
        Biome::Ocean,
        Biome::SeaIce,
        Biome::SnowMountain,
        Biome::Mountain,
        Biome::Highland,
        Biome::Marsh,
        Biome::Swamp,
        Biome::ColdDesert,
        Biome::Desert,
        Biome::Tundra,
        Biome::Taiga,
        Biome::Steppe,
        Biome::TemperateForest,
        Biome::Grassland,
        Biome::TropicalRainforest,
        Biome::Savanna,
        Biome::Badlands,
        Biome::River,
    ];

    /// Идентификатор биома, как он хранится в таблицах и переопределениях.
    pub fn id(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::SeaIce => "sea_ice",
            Biome::SnowMountain => "snow_mountain",
            Biome::Mountain => "mountain",
            Biome::Highland => "highland",
            Biome::Marsh => "marsh",
            Biome::Swamp => "swamp",
            Biome::ColdDesert => "cold_desert",
            Biome::Desert => "desert",
            Biome::Tundra => "tundra",
            Biome::Taiga => "taiga",
            Biome::Steppe => "steppe",
            Biome::TemperateForest => "temperate_forest",
            Biome::Grassland => "grassland",
            Biome::TropicalRainforest => "tropical_rainforest",
            Biome::Savanna => "savanna",
            Biome::Badlands => "badlands",
            Biome::River => "river",
        }
    }

    pub fn is_ocean(self) -> bool {
        matches!(self, Biome::Ocean | Biome::SeaIce)
    }

    /// Стоимость прохода клетки при расширении территории фракции.
    pub fn traversal_cost(self) -> u32 {
        match self {
            Biome::Mountain | Biome::SnowMountain => 3,
            Biome::Swamp | Biome::Marsh => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Biome {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Biome::ALL
            .into_iter()
            .find(|b| b.id() == s)
            .ok_or_else(|| GenerationError::InvalidBiome(s.to_string()))
    }
}

/// Классифицирует клетку. Порядок проверок важен: срабатывает первое совпадение.
pub fn classify(elevation: f32, temperature: f32, moisture: f32, ocean: bool, sea_level: f32) -> Biome {
    let (e, t, m) = (elevation, temperature, moisture);

    if ocean {
        return if t < 0.18 { Biome::SeaIce } else { Biome::Ocean };
    }

    // 1. Горы и нагорья
    if e > sea_level + 0.85 {
        return if t < 0.35 { Biome::SnowMountain } else { Biome::Mountain };
    }
    if e > sea_level + 0.62 {
        return Biome::Highland;
    }

    // 2. Болота у моря
    if m > 0.78 && e < sea_level + 0.20 {
        return if t < 0.45 { Biome::Marsh } else { Biome::Swamp };
    }

    // 3. Пустыни
    if m < 0.22 {
        return if t < 0.35 { Biome::ColdDesert } else { Biome::Desert };
    }

    // 4. Холодные пояса
    if t < 0.20 {
        return Biome::Tundra;
    }
    if t < 0.32 {
        return if m > 0.45 { Biome::Taiga } else { Biome::Steppe };
    }

    // 5. Умеренный пояс
    if t < 0.62 {
        return if m > 0.62 {
            Biome::TemperateForest
        } else if m > 0.40 {
            Biome::Grassland
        } else {
            Biome::Steppe
        };
    }

    // 6. Тропики
    if m > 0.70 {
        Biome::TropicalRainforest
    } else if m > 0.42 {
        Biome::Savanna
    } else {
        Biome::Badlands
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Biome>,
}

/// Назначает биомы на основе высоты, температуры и влажности
pub fn assign_biomes(
    shape: GridShape,
    elevation: &[f32],
    temperature: &[f32],
    moisture: &[f32],
    ocean: &[bool],
    sea_level: f32,
) -> BiomeMap {
    let data = elevation
        .iter()
        .enumerate()
        .map(|(i, &e)| classify(e, temperature[i], moisture[i], ocean[i], sea_level))
        .collect();

    BiomeMap {
        width: shape.width,
        height: shape.height,
        data,
    }
}

impl BiomeMap {
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    /// Помечает речные клетки суши биомом `river`. Сами поля не меняются.
    pub fn stamp_rivers(&mut self, river: &[u8], ocean: &[bool]) {
        for (i, biome) in self.data.iter_mut().enumerate() {
            if river[i] > 0 && !ocean[i] {
                *biome = Biome::River;
            }
        }
    }

    /// Применяет ручные переопределения биомов
    ///
    /// Океан к переопределениям невосприимчив, а на суше нельзя поставить океанский биом.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<GridPos, Biome>, ocean: &[bool]) -> usize {
        let shape = self.shape();
        let mut applied = 0;
        for (&pos, &biome) in overrides {
            let Some(idx) = shape.checked_index(pos) else {
                continue;
            };
            if ocean[idx] || biome.is_ocean() {
                continue;
            }
            self.data[idx] = biome;
            applied += 1;
        }
        applied
    }

    /// Число клеток каждого биома.
    pub fn counts(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for &b in &self.data {
            *counts.entry(b).or_insert(0) += 1;
        }
        counts
    }
}
