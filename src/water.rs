//! Океан и расстояние до берега.
//!
//! Уровень океана — перцентиль высот, поэтому доля океана не зависит от амплитуды шума.

use std::collections::VecDeque;

use crate::grid::{DIRECTIONS_4, GridShape};
use crate::heightmap::Heightmap;

/// Расстояние для клеток, до которых BFS не дошёл.
pub const UNREACHED: u32 = u32::MAX;

/// Высота на перцентиле `ocean_percent` (индекс `floor(p * (n - 1))` в отсортированном ряду).
///
/// Вместо полной сортировки используется `select_nth_unstable_by`.
#[must_use]
pub fn ocean_threshold(elevation: &[f32], ocean_percent: f32) -> f32 {
    if elevation.is_empty() {
        return 0.0;
    }
    let mut scratch = elevation.to_vec();
    let k = (f64::from(ocean_percent.clamp(0.0, 1.0)) * (scratch.len() - 1) as f64) as usize;
    let k = k.min(scratch.len() - 1);
    let (_, nth, _) = scratch.select_nth_unstable_by(k, f32::total_cmp);
    *nth
}

#[must_use]
pub fn ocean_mask(elevation: &[f32], threshold: f32) -> Vec<bool> {
    elevation.iter().map(|&e| e <= threshold).collect()
}

/// Многоисточниковый BFS от всех клеток океана (4-связность, X зациклен).
#[must_use]
pub fn coast_distance(shape: GridShape, ocean: &[bool]) -> Vec<u32> {
    let mut dist = vec![UNREACHED; shape.len()];
    let mut queue = VecDeque::new();

    for (idx, &is_ocean) in ocean.iter().enumerate() {
        if is_ocean {
            dist[idx] = 0;
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        let next = dist[idx] + 1;
        for nidx in shape.neighbors(idx, &DIRECTIONS_4) {
            if next < dist[nidx] {
                dist[nidx] = next;
                queue.push_back(nidx);
            }
        }
    }

    dist
}

/// Убирает тонкие «шипы» береговой линии
///
/// На каждом проходе берётся предварительный порог. Клетка, у которой не меньше трёх
/// соседей другого класса (суша/море), получает среднюю высоту этих соседей.
/// Окончательный порог считается уже после сглаживания.
pub fn smooth_coastline(heightmap: &mut Heightmap, ocean_percent: f32, iterations: u32) -> usize {
    let shape = heightmap.shape();
    let mut changed = 0;

    for _ in 0..iterations {
        let threshold = ocean_threshold(&heightmap.data, ocean_percent);
        let source = heightmap.data.clone();
        let mut pass_changed = 0;

        for (idx, value) in heightmap.data.iter_mut().enumerate() {
            let is_ocean = source[idx] <= threshold;
            let mut opposite = 0;
            let mut sum = 0.0;
            for nidx in shape.neighbors(idx, &DIRECTIONS_4) {
                if (source[nidx] <= threshold) != is_ocean {
                    opposite += 1;
                    sum += source[nidx];
                }
            }
            if opposite >= 3 {
                *value = sum / opposite as f32;
                pass_changed += 1;
            }
        }

        changed += pass_changed;
        if pass_changed == 0 {
            break;
        }
    }

    changed
}
