use serde::{Deserialize, Serialize};

use crate::grid::{DIRECTIONS_8, GridPos, GridShape};
use crate::heightmap::Heightmap;
use crate::noise::sample_coord;

/// Прирост интенсивности за одно посещение клетки рекой.
pub const RIVER_STEP: u8 = 24;

/// Исток должен быть выше порога океана хотя бы на столько.
const MIN_SOURCE_HEIGHT: f32 = 0.25;

/// Минимальное расстояние между истоками и глубина окна проверки.
const SOURCE_SPACING: i64 = 12;
const SOURCE_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverMap {
    pub width: u32,
    pub height: u32,
    /// Интенсивность 0..=255, ноль: реки нет
    pub data: Vec<u8>,
    /// Принятые истоки в порядке трассировки
    pub sources: Vec<GridPos>,
}

/// Выбирает истоки: суша, заметно выше уровня океана, не ближе 12 клеток к недавним истокам.
///
/// Делает не больше `8 × river_count` попыток; найденных истоков может оказаться меньше.
pub fn pick_river_sources(
    heightmap: &Heightmap,
    ocean: &[bool],
    ocean_threshold: f32,
    seed: u32,
    river_count: u32,
) -> Vec<GridPos> {
    let shape = heightmap.shape();
    let mut sources: Vec<GridPos> = Vec::new();
    let attempts = river_count.saturating_mul(8);

    for k in 0..attempts {
        if sources.len() >= river_count as usize {
            break;
        }
        let x = sample_coord(seed.wrapping_add(777), k, 13, shape.width);
        let y = sample_coord(seed.wrapping_add(779), k, 31, shape.height);
        let idx = shape.index(x, y);
        if ocean[idx] || heightmap.data[idx] < ocean_threshold + MIN_SOURCE_HEIGHT {
            continue;
        }

        let candidate = GridPos::new(x as i32, y as i32);
        let recent = &sources[sources.len().saturating_sub(SOURCE_WINDOW)..];
        let crowded = recent
            .iter()
            .any(|&s| shape.wrapped_dist2(candidate, s) < SOURCE_SPACING * SOURCE_SPACING);
        if !crowded {
            sources.push(candidate);
        }
    }

    sources
}

/// Самый низкий из 8 соседей, если он строго ниже текущей клетки.
fn downhill_step(shape: GridShape, elevation: &[f32], idx: usize) -> Option<usize> {
    let mut best = None;
    let mut best_e = elevation[idx];
    for nidx in shape.neighbors(idx, &DIRECTIONS_8) {
        if elevation[nidx] < best_e {
            best_e = elevation[nidx];
            best = Some(nidx);
        }
    }
    best
}

/// Трассирует реки по наискорейшему спуску
///
/// Каждое посещение клетки суши добавляет [`RIVER_STEP`] (не выше 255). Река останавливается
/// в океане, в локальной яме или через `max_steps` шагов.
pub fn generate_rivers(
    heightmap: &Heightmap,
    ocean: &[bool],
    ocean_threshold: f32,
    seed: u32,
    river_count: u32,
    max_steps: u32,
) -> RiverMap {
    let shape = heightmap.shape();
    let sources = pick_river_sources(heightmap, ocean, ocean_threshold, seed, river_count);
    let mut data = vec![0u8; shape.len()];

    for source in &sources {
        let Some(mut idx) = shape.checked_index(*source) else {
            continue;
        };
        for _ in 0..max_steps {
            if ocean[idx] {
                break;
            }
            data[idx] = data[idx].saturating_add(RIVER_STEP);
            match downhill_step(shape, &heightmap.data, idx) {
                Some(next) => idx = next,
                // Локальная яма: дальше течь некуда
                None => break,
            }
        }
    }

    RiverMap {
        width: heightmap.width,
        height: heightmap.height,
        data,
        sources,
    }
}
