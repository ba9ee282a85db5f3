//! Точки интереса: природные, цивилизационные, катастрофы и ручные.

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::civilization::Settlement;
use crate::grid::{GridPos, GridShape};
use crate::noise::{hash32, rand01, sample_coord};
use crate::tables::{PoiPools, Preset};

/// Минимальное расстояние между точками и размер окна проверки.
const POI_SPACING: i64 = 14;
const POI_WINDOW: usize = 80;

/// Цивилизационная точка должна быть не дальше этого от одного из первых поселений.
const SETTLEMENT_REACH: i64 = 20;
const SETTLEMENT_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Natural,
    Civilization,
    Catastrophe,
    #[default]
    Custom,
}

impl PoiCategory {
    /// Постоянные соли выборки координат: (для X, для Y).
    fn salts(self) -> (u32, u32) {
        let h = hash32(self as u32 + 1);
        (h % 997, h % 991)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub position: GridPos,
    pub name: String,
    pub category: PoiCategory,
    pub biome: Biome,
    pub faction_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Точка, добавленная вручную
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiEdit {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_edit_name")]
    pub name: String,
    #[serde(default)]
    pub category: PoiCategory,
    #[serde(default = "default_edit_faction")]
    pub faction: i32,
    #[serde(default)]
    pub notes: String,
}

fn default_edit_name() -> String {
    "Custom POI".to_string()
}
fn default_edit_faction() -> i32 {
    -1
}

impl PoiEdit {
    pub fn new(x: i32, y: i32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: name.into(),
            category: PoiCategory::Custom,
            faction: -1,
            notes: String::new(),
        }
    }
}

/// Сколько точек каждой категории пытаемся разместить
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoiQuotas {
    pub natural: usize,
    pub civilization: usize,
    pub catastrophe: usize,
    pub ruins: usize,
}

impl PoiQuotas {
    pub fn new(shape: GridShape, preset_key: &str, preset: &Preset, settlement_count: usize) -> Self {
        let natural = ((shape.len() as f64).sqrt() * 1.6) as usize;
        let natural = natural.max(24);
        let mut civilization = if preset.has_civilization() {
            ((settlement_count as f64 * 0.45) as usize).max(18)
        } else {
            0
        };
        let mut catastrophe = ((natural as f64 * 0.18) as usize).max(6);
        if preset_key == "apocalypse" {
            catastrophe = catastrophe.max((natural as f64 * 0.35) as usize);
            civilization = ((civilization as f64 * 0.7) as usize).max(10);
        }
        let ruins = if preset.has_civilization() {
            (natural as f64 * f64::from(preset.ruins_density) * 0.6) as usize
        } else {
            0
        };
        Self {
            natural,
            civilization,
            catastrophe,
            ruins,
        }
    }
}

/// Слои мира, по которым проверяются кандидаты.
#[derive(Debug, Clone, Copy)]
pub struct PoiContext<'a> {
    pub shape: GridShape,
    pub seed: u32,
    pub ocean: &'a [bool],
    pub biome: &'a [Biome],
    pub faction_id: &'a [i32],
    pub settlements: &'a [Settlement],
    pub civilization_enabled: bool,
}

impl PoiContext<'_> {
    fn near_settlement(&self, pos: GridPos) -> bool {
        let reach = SETTLEMENT_REACH * SETTLEMENT_REACH;
        self.settlements
            .iter()
            .take(SETTLEMENT_WINDOW)
            .any(|s| self.shape.wrapped_dist2(pos, s.position) < reach)
    }

    fn pick_name(&self, pool: &[String], k: u32) -> String {
        if pool.is_empty() {
            return format!("POI-{k}");
        }
        let r = rand01(self.seed.wrapping_add(5511), k as i32, 97);
        let idx = ((r * pool.len() as f32) as usize).min(pool.len() - 1);
        pool[idx].clone()
    }
}

/// Размещает до `count` точек одной категории, делая не больше `20 × count` попыток
///
/// `bias_ruins` требует, чтобы клетка принадлежала какой-нибудь фракции.
pub fn place_pois(
    ctx: &PoiContext<'_>,
    pois: &mut Vec<Poi>,
    count: usize,
    pool: &[String],
    category: PoiCategory,
    bias_ruins: bool,
) -> usize {
    let shape = ctx.shape;
    let (salt_x, salt_y) = category.salts();
    let seed_x = ctx.seed.wrapping_add(6001).wrapping_add(salt_x);
    let seed_y = ctx.seed.wrapping_add(6007).wrapping_add(salt_y);
    let tries = u32::try_from(count.saturating_mul(20)).unwrap_or(u32::MAX);
    let mut placed = 0;

    for k in 0..tries {
        if placed >= count {
            break;
        }
        let x = sample_coord(seed_x, k, 17, shape.width);
        let y = sample_coord(seed_y, k, 33, shape.height);
        let idx = shape.index(x, y);
        if ctx.ocean[idx] {
            continue;
        }

        let pos = GridPos::new(x as i32, y as i32);
        let recent = &pois[pois.len().saturating_sub(POI_WINDOW)..];
        if recent
            .iter()
            .any(|p| shape.wrapped_dist2(pos, p.position) < POI_SPACING * POI_SPACING)
        {
            continue;
        }
        if category == PoiCategory::Civilization && ctx.civilization_enabled && !ctx.near_settlement(pos) {
            continue;
        }
        if bias_ruins && ctx.faction_id[idx] < 0 {
            continue;
        }

        pois.push(Poi {
            position: pos,
            name: ctx.pick_name(pool, k.wrapping_add((placed as u32).wrapping_mul(7))),
            category,
            biome: ctx.biome[idx],
            faction_id: ctx.faction_id[idx],
            notes: None,
        });
        placed += 1;
    }

    placed
}

/// Все сгенерированные точки: природа, цивилизация, катастрофы, затем руины.
pub fn generate_pois(ctx: &PoiContext<'_>, pools: &PoiPools, quotas: PoiQuotas) -> Vec<Poi> {
    let mut pois = Vec::new();

    place_pois(ctx, &mut pois, quotas.natural, &pools.natural, PoiCategory::Natural, false);
    if ctx.civilization_enabled {
        place_pois(
            ctx,
            &mut pois,
            quotas.civilization,
            &pools.civilization,
            PoiCategory::Civilization,
            true,
        );
    }
    place_pois(
        ctx,
        &mut pois,
        quotas.catastrophe,
        &pools.catastrophe,
        PoiCategory::Catastrophe,
        false,
    );
    if ctx.civilization_enabled && quotas.ruins > 0 {
        place_pois(ctx, &mut pois, quotas.ruins, &pools.ruins(), PoiCategory::Civilization, true);
    }

    pois
}

/// Добавляет ручные точки как есть; отбрасываются только клетки вне сетки и на океане.
pub fn apply_poi_edits(ctx: &PoiContext<'_>, pois: &mut Vec<Poi>, edits: &[PoiEdit]) -> usize {
    let mut applied = 0;
    for edit in edits {
        let pos = GridPos::new(edit.x, edit.y);
        let Some(idx) = ctx.shape.checked_index(pos) else {
            continue;
        };
        if ctx.ocean[idx] {
            continue;
        }
        pois.push(Poi {
            position: pos,
            name: edit.name.clone(),
            category: edit.category,
            biome: ctx.biome[idx],
            faction_id: edit.faction,
            notes: Some(edit.notes.trim().to_string()),
        });
        applied += 1;
    }
    applied
}
