// src/civilization/territory.rs
use std::collections::VecDeque;

use crate::biome::Biome;
use crate::grid::{DIRECTIONS_4, GridPos, GridShape};
use crate::noise::sample_coord;

/// Расстояние для клеток, не занятых ни одной фракцией.
pub const UNCLAIMED: u32 = u32::MAX;

/// Ядро фракции не ставится выше этого превышения над уровнем океана.
const CORE_MAX_HEIGHT: f32 = 0.75;

/// Выбирает ядра фракций: суша, не высокогорье, попарно не ближе `sqrt(w·h)` в квадрате расстояния.
///
/// Если кандидаты кончились раньше, ядер будет меньше `target`, и это не ошибка.
pub fn place_faction_cores(
    shape: GridShape,
    seed: u32,
    elevation: &[f32],
    ocean: &[bool],
    ocean_threshold: f32,
    target: usize,
) -> Vec<GridPos> {
    let mut cores: Vec<GridPos> = Vec::with_capacity(target);
    if target == 0 {
        return cores;
    }

    let min_dist2 = (shape.len() as f64).sqrt();
    let attempts = (target as u32).saturating_mul(250).max(1000);

    for k in 0..attempts {
        let x = sample_coord(seed.wrapping_add(9001), k, 7, shape.width);
        let y = sample_coord(seed.wrapping_add(9003), k, 19, shape.height);
        let idx = shape.index(x, y);
        if ocean[idx] || elevation[idx] > ocean_threshold + CORE_MAX_HEIGHT {
            continue;
        }

        let candidate = GridPos::new(x as i32, y as i32);
        let crowded = cores
            .iter()
            .any(|&c| (shape.wrapped_dist2(candidate, c) as f64) < min_dist2);
        if !crowded {
            cores.push(candidate);
            if cores.len() >= target {
                break;
            }
        }
    }

    cores
}

#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    /// Владелец клетки, -1 — ничья
    pub faction_id: Vec<i32>,
    /// Взвешенное расстояние от ядра владельца
    pub distance: Vec<u32>,
}

/// Многоисточниковая заливка с весами проходимости
///
/// Очередь FIFO, а не приоритетная: при весах 2 и 3 границы могут отличаться от точных
/// кратчайших путей, зато совпадают с поведением редактора.
pub fn assign_territory(shape: GridShape, cores: &[GridPos], ocean: &[bool], biome: &[Biome]) -> Territory {
    let mut faction_id = vec![-1; shape.len()];
    let mut distance = vec![UNCLAIMED; shape.len()];
    let mut queue = VecDeque::new();

    for (fid, &core) in cores.iter().enumerate() {
        let Some(idx) = shape.checked_index(core) else {
            continue;
        };
        distance[idx] = 0;
        faction_id[idx] = fid as i32;
        queue.push_back(idx);
    }

    while let Some(idx) = queue.pop_front() {
        let fid = faction_id[idx];
        let base = distance[idx];
        for nidx in shape.neighbors(idx, &DIRECTIONS_4) {
            if ocean[nidx] {
                continue;
            }
            let next = base.saturating_add(biome[nidx].traversal_cost());
            if next < distance[nidx] {
                distance[nidx] = next;
                faction_id[nidx] = fid;
                queue.push_back(nidx);
            }
        }
    }

    Territory {
        faction_id,
        distance,
    }
}

/// Радиус затухания влияния: 12% от `width + height`, но не меньше 25 клеток.
pub fn strength_radius(shape: GridShape) -> f32 {
    let r = ((shape.width + shape.height) as f32 * 0.12) as u32;
    r.max(25) as f32
}

/// Сила влияния `exp(-d / r)`; ноль вне территорий и на океане.
pub fn faction_strength(shape: GridShape, territory: &Territory, ocean: &[bool]) -> Vec<f32> {
    let radius = strength_radius(shape);
    territory
        .faction_id
        .iter()
        .zip(&territory.distance)
        .zip(ocean)
        .map(|((&fid, &d), &is_ocean)| {
            if fid >= 0 && !is_ocean {
                (-(d as f32) / radius).exp()
            } else {
                0.0
            }
        })
        .collect()
}
