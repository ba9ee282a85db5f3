//! Тектонические плиты: разбиение Вороного на цилиндре и поле хребтов на их границах.

use crate::grid::{DIRECTIONS_8, GridPos, GridShape};
use crate::heightmap::box_blur;
use crate::noise::sample_coord;

/// Число проходов размытия маски границ.
pub const RIDGE_BLUR_PASSES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct PlateField {
    /// Центры плит
    pub sites: Vec<GridPos>,
    /// Номер плиты для каждой клетки
    pub plate_id: Vec<u32>,
    /// Близость к границе плит в [0, 1]
    pub ridge: Vec<f32>,
}

/// Разбивает сетку на `plate_count` плит и строит поле хребтов
///
/// При `plate_count < 2` весь мир — одна плита, хребтов нет.
pub fn build_plates(shape: GridShape, seed: u32, plate_count: u32) -> PlateField {
    let n = shape.len();
    if plate_count < 2 {
        return PlateField {
            sites: vec![GridPos::new(0, 0)],
            plate_id: vec![0; n],
            ridge: vec![0.0; n],
        };
    }

    let sites: Vec<GridPos> = (0..plate_count)
        .map(|i| {
            let k = i.wrapping_mul(97);
            GridPos::new(
                sample_coord(seed.wrapping_add(17), k, 11, shape.width) as i32,
                sample_coord(seed.wrapping_add(19), k, 29, shape.height) as i32,
            )
        })
        .collect();

    // Ближайший центр по квадрату расстояния, X с учётом шва
    let plate_id: Vec<u32> = (0..n)
        .map(|idx| {
            let pos = shape.position(idx);
            let mut best = 0;
            let mut best_d = i64::MAX;
            for (i, &site) in sites.iter().enumerate() {
                let d = shape.wrapped_dist2(pos, site);
                if d < best_d {
                    best_d = d;
                    best = i as u32;
                }
            }
            best
        })
        .collect();

    let mut ridge: Vec<f32> = (0..n)
        .map(|idx| {
            let pid = plate_id[idx];
            let on_boundary = shape
                .neighbors(idx, &DIRECTIONS_8)
                .any(|j| plate_id[j] != pid);
            if on_boundary { 1.0 } else { 0.0 }
        })
        .collect();

    for _ in 0..RIDGE_BLUR_PASSES {
        box_blur(&mut ridge, shape.width as usize, shape.height as usize, 1);
    }

    PlateField {
        sites,
        plate_id,
        ridge,
    }
}
