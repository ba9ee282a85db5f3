//! Геометрия сетки: цилиндрический мир, зацикленный по X и ограниченный по Y.
//!
//! Все попиксельные слои хранятся плоскими массивами с индексом `y * width + x`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// 4-связные соседи (порядок важен для детерминизма обходов).
pub const DIRECTIONS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 8-связные соседи; при равных высотах сток выбирает первого в этом порядке.
pub const DIRECTIONS_8: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Координата клетки. В текстовом виде (ключи переопределений) — `"x,y"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for GridPos {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GenerationError::InvalidCellKey(s.to_string());
        let (xs, ys) = s.split_once(',').ok_or_else(invalid)?;
        let x = xs.trim().parse().map_err(|_| invalid())?;
        let y = ys.trim().parse().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

/// Размеры сетки и вся арифметика соседства.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub width: u32,
    pub height: u32,
}

impl GridShape {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn index(self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Индекс клетки, если координата внутри сетки (без зацикливания).
    #[must_use]
    pub fn checked_index(self, pos: GridPos) -> Option<usize> {
        let inside = pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height;
        inside.then(|| self.index(pos.x as u32, pos.y as u32))
    }

    #[must_use]
    pub const fn position(self, idx: usize) -> GridPos {
        let w = self.width as usize;
        GridPos::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Нормированная широта строки: -1 (верх) .. 1 (низ), экватор = 0.
    #[must_use]
    pub fn latitude(self, y: u32) -> f32 {
        if self.height < 2 {
            return 0.0;
        }
        (y as f32 / (self.height - 1) as f32) * 2.0 - 1.0
    }

    /// Горизонтальное расстояние с учётом шва: `min(dx, width - dx)`.
    #[must_use]
    pub fn wrapped_dx(self, x0: i32, x1: i32) -> i32 {
        let dx = (x0 - x1).abs() % self.width as i32;
        dx.min(self.width as i32 - dx)
    }

    /// Квадрат расстояния между клетками на цилиндре.
    #[must_use]
    pub fn wrapped_dist2(self, a: GridPos, b: GridPos) -> i64 {
        let dx = i64::from(self.wrapped_dx(a.x, b.x));
        let dy = i64::from(a.y - b.y);
        dx * dx + dy * dy
    }

    /// Соседи клетки: X зацикливается, строки за пределами сетки пропускаются.
    pub fn neighbors(self, idx: usize, offsets: &[(i32, i32)]) -> impl Iterator<Item = usize> + '_ {
        let w = self.width as i32;
        let h = self.height as i32;
        let x = (idx % self.width as usize) as i32;
        let y = (idx / self.width as usize) as i32;
        offsets.iter().filter_map(move |&(dx, dy)| {
            let ny = y + dy;
            if ny < 0 || ny >= h {
                return None;
            }
            let nx = (x + dx).rem_euclid(w);
            Some(ny as usize * w as usize + nx as usize)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_keys_round_trip_through_text() {
        let pos: GridPos = "10, -3".parse().unwrap();
        assert_eq!(pos, GridPos::new(10, -3));
        assert_eq!(pos.to_string(), "10,-3");
        assert!("10".parse::<GridPos>().is_err());
        assert!("a,b".parse::<GridPos>().is_err());
    }

    #[test]
    fn seam_distance_is_short() {
        let shape = GridShape::new(64, 32);
        assert_eq!(shape.wrapped_dx(0, 63), 1);
        assert_eq!(shape.wrapped_dx(63, 0), 1);
        assert_eq!(shape.wrapped_dx(0, 32), 32);
        for x in 0..64 {
            assert!(shape.wrapped_dx(0, x) <= 32);
        }
        assert_eq!(shape.wrapped_dist2(GridPos::new(0, 0), GridPos::new(63, 2)), 5);
    }

    #[test]
    fn neighbors_wrap_horizontally_and_clip_vertically() {
        let shape = GridShape::new(8, 4);
        let corner = shape.index(0, 0);
        let mut around: Vec<usize> = shape.neighbors(corner, &DIRECTIONS_4).collect();
        around.sort_unstable();
        assert_eq!(around, vec![1, 7, 8]);
        assert_eq!(shape.neighbors(corner, &DIRECTIONS_8).count(), 5);
    }

    #[test]
    fn checked_index_rejects_out_of_bounds() {
        let shape = GridShape::new(8, 4);
        assert_eq!(shape.checked_index(GridPos::new(7, 3)), Some(31));
        assert_eq!(shape.checked_index(GridPos::new(8, 0)), None);
        assert_eq!(shape.checked_index(GridPos::new(-1, 0)), None);
        assert_eq!(shape.position(31), GridPos::new(7, 3));
    }

    #[test]
    fn latitude_spans_pole_to_pole() {
        let shape = GridShape::new(4, 5);
        assert!((shape.latitude(0) + 1.0).abs() < 1e-6);
        assert!(shape.latitude(2).abs() < 1e-6);
        assert!((shape.latitude(4) - 1.0).abs() < 1e-6);
        assert!(GridShape::new(4, 1).latitude(0).abs() < 1e-6);
    }
}
