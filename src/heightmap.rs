use std::collections::BTreeMap;

use crate::grid::{GridPos, GridShape};
use crate::noise::fbm_noise;

/// Двумерная карта высот. Значения не нормированы: уровень океана задаётся порогом-перцентилем.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl Heightmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.shape().index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = self.shape().index(x, y);
        self.data[idx] = value;
    }

    /// Прибавляет дельты переопределений. Ключи вне сетки молча пропускаются.
    pub fn apply_deltas(&mut self, deltas: &BTreeMap<GridPos, f32>) -> usize {
        let shape = self.shape();
        let mut applied = 0;
        for (&pos, &delta) in deltas {
            if let Some(idx) = shape.checked_index(pos) {
                self.data[idx] += delta;
                applied += 1;
            }
        }
        applied
    }
}

/// Генерирует карту высот: fBm + подъём на границах плит + широтная поправка
///
/// `ridge` — поле близости к границам плит в [0, 1].
pub fn generate_elevation(shape: GridShape, seed: u32, ruggedness: f32, ridge: &[f32]) -> Heightmap {
    // Крупные формы: период шума привязан к меньшей стороне, но не мельче 128 клеток
    let scale = 1.6 / shape.width.min(shape.height).max(128) as f32;
    let noise_seed = seed.wrapping_add(101);

    let mut heightmap = Heightmap::new(shape.width, shape.height);
    for y in 0..shape.height {
        let lat_factor = 1.0 - shape.latitude(y).abs().powf(1.7);
        for x in 0..shape.width {
            let idx = shape.index(x, y);
            let n = fbm_noise(x as f32 * scale, y as f32 * scale, noise_seed, 6, 2.0, 0.5);
            let mut e = (n - 0.5) * 1.8;
            e += ridge[idx].max(0.0).powf(1.6) * 0.95 * ruggedness;
            e += (lat_factor - 0.55) * 0.08;
            heightmap.data[idx] = e;
        }
    }
    heightmap
}

/// Сглаживание средним в окне `(2r+1)×(2r+1)`
///
/// По X окно зацикливается, по Y строки за краем не учитываются (делим на число реальных клеток).
pub fn box_blur(data: &mut [f32], width: usize, height: usize, radius: usize) {
    if radius == 0 || width == 0 || height == 0 {
        return;
    }

    let r = radius as i32;
    let mut temp = vec![0.0; data.len()];

    // 1. Горизонтальный проход (бесшовный). Окно суммируется заново для каждой клетки,
    // поэтому неотрицательное поле остаётся неотрицательным, а нули остаются нулями.
    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        for x in 0..width {
            let sum: f32 = (-r..=r)
                .map(|dx| row[(x as i32 + dx).rem_euclid(width as i32) as usize])
                .sum();
            temp[y * width + x] = sum / (2 * radius + 1) as f32;
        }
    }

    // 2. Вертикальный проход (строки за краем отбрасываются)
    for x in 0..width {
        for y in 0..height {
            let lo = y.saturating_sub(radius);
            let hi = (y + radius).min(height - 1);
            let sum: f32 = (lo..=hi).map(|yy| temp[yy * width + x]).sum();
            data[y * width + x] = sum / (hi - lo + 1) as f32;
        }
    }
}
