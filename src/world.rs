//! Сборка мира: все стадии генерации в фиксированном порядке.
//!
//! Результат — неизменяемый [`World`]. Правки живут только в [`Overrides`] и применяются
//! при следующей полной генерации.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use petgraph::graph::UnGraph;
use serde::Serialize;

use crate::biome::{Biome, assign_biomes};
use crate::civilization::{CivilizationInputs, Road, Settlement, generate_civilization, road_network};
use crate::climate::{ClimateInputs, generate_climate_maps};
use crate::config::PlanetConfig;
use crate::error::Result;
use crate::grid::{GridPos, GridShape};
use crate::heightmap::generate_elevation;
use crate::overrides::Overrides;
use crate::plates::build_plates;
use crate::poi::{Poi, PoiContext, PoiQuotas, apply_poi_edits, generate_pois};
use crate::rivers::generate_rivers;
use crate::tables::{PoiPools, Preset};
use crate::water::{coast_distance, ocean_mask, ocean_threshold, smooth_coastline};

/// Краткая сводка по миру
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub preset_name: String,
    pub faction_style: String,
    pub hazards: Vec<String>,
    pub land_fraction: f32,
    pub biome_counts: BTreeMap<Biome, usize>,
    pub factions: usize,
    pub settlements: usize,
    pub roads: usize,
    pub pois: usize,
    pub river_sources: usize,
}

/// Сгенерированный мир. Все поклеточные массивы длины `width × height`, индекс `y * width + x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    config: PlanetConfig,
    width: u32,
    height: u32,
    ocean_threshold: f32,
    elevation: Vec<f32>,
    ocean: Vec<bool>,
    plate_id: Vec<u32>,
    ridge: Vec<f32>,
    coast_distance: Vec<u32>,
    temperature: Vec<f32>,
    moisture: Vec<f32>,
    biome: Vec<Biome>,
    river_intensity: Vec<u8>,
    river_sources: Vec<GridPos>,
    faction_id: Vec<i32>,
    faction_strength: Vec<f32>,
    faction_cores: Vec<GridPos>,
    settlements: Vec<Settlement>,
    roads: Vec<Road>,
    pois: Vec<Poi>,
    summary: WorldSummary,
}

/// Генерирует мир целиком
///
/// Чистая функция: одинаковые конфигурация, пресет, пулы и правки дают побитно одинаковый мир.
///
/// # Ошибки
/// Некорректная конфигурация (нулевые размеры, нечисловые параметры) или пресет
/// с недопустимыми плотностями. Частичный мир не возвращается.
pub fn generate_world(
    config: &PlanetConfig,
    preset: &Preset,
    pools: &PoiPools,
    overrides: &Overrides,
) -> Result<World> {
    let config = config.normalized()?;
    preset.validate()?;
    let shape = config.shape();
    let seed = config.seed32();
    tracing::debug!(
        width = shape.width,
        height = shape.height,
        seed,
        preset = %config.preset_key,
        "generating world"
    );

    let plates = build_plates(shape, seed, config.plate_count);
    tracing::debug!(plates = plates.sites.len(), "plates built");

    let mut heightmap = generate_elevation(shape, seed, config.ruggedness, &plates.ridge);
    let smoothed = smooth_coastline(&mut heightmap, config.ocean_percent, config.coast_smooth_iters);
    let edited = heightmap.apply_deltas(&overrides.elevation_delta);
    tracing::debug!(smoothed, edited, "elevation ready");

    let threshold = ocean_threshold(&heightmap.data, config.ocean_percent);
    let ocean = ocean_mask(&heightmap.data, threshold);
    let coast = coast_distance(shape, &ocean);
    tracing::debug!(threshold, "ocean mask built");

    let rivers = generate_rivers(
        &heightmap,
        &ocean,
        threshold,
        seed,
        config.river_count,
        config.river_max_steps,
    );
    tracing::debug!(sources = rivers.sources.len(), "rivers traced");

    let climate = generate_climate_maps(
        shape,
        &config,
        ClimateInputs {
            elevation: &heightmap.data,
            ocean_threshold: threshold,
            coast_distance: &coast,
            ridge: &plates.ridge,
        },
    );

    let mut biomes = assign_biomes(
        shape,
        &heightmap.data,
        &climate.temperature,
        &climate.moisture,
        &ocean,
        threshold,
    );
    biomes.stamp_rivers(&rivers.data, &ocean);
    let painted = biomes.apply_overrides(&overrides.biome_override, &ocean);
    tracing::debug!(painted, "biomes assigned");

    let civ = generate_civilization(
        shape,
        &config,
        preset,
        CivilizationInputs {
            elevation: &heightmap.data,
            ocean: &ocean,
            ocean_threshold: threshold,
            biome: &biomes.data,
            moisture: &climate.moisture,
            temperature: &climate.temperature,
            coast_distance: &coast,
            river: &rivers.data,
        },
    );

    let poi_ctx = PoiContext {
        shape,
        seed,
        ocean: &ocean,
        biome: &biomes.data,
        faction_id: &civ.faction_id,
        settlements: &civ.settlements,
        civilization_enabled: preset.has_civilization(),
    };
    let quotas = PoiQuotas::new(shape, &config.preset_key, preset, civ.settlements.len());
    let mut pois = generate_pois(&poi_ctx, pools, quotas);
    let forced = apply_poi_edits(&poi_ctx, &mut pois, &overrides.poi_edits);
    tracing::debug!(pois = pois.len(), forced, "points of interest placed");

    let land = ocean.iter().filter(|&&o| !o).count();
    let summary = WorldSummary {
        preset_name: preset.name.clone().unwrap_or_else(|| config.preset_key.clone()),
        faction_style: preset.faction_style.clone(),
        hazards: preset.hazards.clone(),
        land_fraction: land as f32 / shape.len() as f32,
        biome_counts: biomes.counts(),
        factions: civ.faction_cores.len(),
        settlements: civ.settlements.len(),
        roads: civ.roads.len(),
        pois: pois.len(),
        river_sources: rivers.sources.len(),
    };
    tracing::info!(
        land_fraction = summary.land_fraction,
        factions = summary.factions,
        settlements = summary.settlements,
        pois = summary.pois,
        "world generated"
    );

    Ok(World {
        width: shape.width,
        height: shape.height,
        ocean_threshold: threshold,
        elevation: heightmap.data,
        ocean,
        plate_id: plates.plate_id,
        ridge: plates.ridge,
        coast_distance: coast,
        temperature: climate.temperature,
        moisture: climate.moisture,
        biome: biomes.data,
        river_intensity: rivers.data,
        river_sources: rivers.sources,
        faction_id: civ.faction_id,
        faction_strength: civ.faction_strength,
        faction_cores: civ.faction_cores,
        settlements: civ.settlements,
        roads: civ.roads,
        pois,
        summary,
        config,
    })
}

impl World {
    /// Нормализованная конфигурация, по которой построен мир.
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    /// Высота, ниже или на уровне которой клетка считается океаном.
    pub fn ocean_threshold(&self) -> f32 {
        self.ocean_threshold
    }

    pub fn elevation(&self) -> &[f32] {
        &self.elevation
    }

    pub fn ocean(&self) -> &[bool] {
        &self.ocean
    }

    pub fn plate_id(&self) -> &[u32] {
        &self.plate_id
    }

    pub fn ridge(&self) -> &[f32] {
        &self.ridge
    }

    pub fn coast_distance(&self) -> &[u32] {
        &self.coast_distance
    }

    pub fn temperature(&self) -> &[f32] {
        &self.temperature
    }

    pub fn moisture(&self) -> &[f32] {
        &self.moisture
    }

    pub fn biome(&self) -> &[Biome] {
        &self.biome
    }

    pub fn river_intensity(&self) -> &[u8] {
        &self.river_intensity
    }

    pub fn river_sources(&self) -> &[GridPos] {
        &self.river_sources
    }

    pub fn faction_id(&self) -> &[i32] {
        &self.faction_id
    }

    pub fn faction_strength(&self) -> &[f32] {
        &self.faction_strength
    }

    pub fn faction_cores(&self) -> &[GridPos] {
        &self.faction_cores
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn summary(&self) -> &WorldSummary {
        &self.summary
    }

    /// Граф дорог между поселениями.
    pub fn road_network(&self) -> UnGraph<usize, i64> {
        road_network(self.shape(), &self.settlements, &self.roads)
    }

    /// Однострочное описание клетки; `None` за пределами сетки
    ///
    /// ```text
    /// (12,7) | LAND | elev=+0.12 | biome=grassland | T=0.55 M=0.43 | river=24 | faction=2 (0.81)
    /// ```
    pub fn describe_cell(&self, x: i32, y: i32) -> Option<String> {
        let idx = self.shape().checked_index(GridPos::new(x, y))?;
        let mut line = format!(
            "({x},{y}) | {} | elev={:+.2} | biome={} | T={:.2} M={:.2} | river={}",
            if self.ocean[idx] { "OCEAN" } else { "LAND" },
            self.elevation[idx],
            self.biome[idx],
            self.temperature[idx],
            self.moisture[idx],
            self.river_intensity[idx],
        );
        let fid = self.faction_id[idx];
        if fid >= 0 {
            let _ = write!(line, " | faction={fid} ({:.2})", self.faction_strength[idx]);
        } else {
            line.push_str(" | faction=none");
        }
        Some(line)
    }
}
