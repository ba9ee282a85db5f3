//! Ручные правки мира: разреженные переопределения, которые применяются при каждой полной генерации.
//!
//! Ключи клеток в сериализованном виде — строки `"x,y"`. Повторная запись по тому же ключу
//! заменяет значение, поэтому повторное применение тех же карт не накапливается.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::grid::{GridPos, GridShape};
use crate::poi::PoiEdit;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    /// Добавка к высоте
    #[serde(default, with = "cell_keys")]
    pub elevation_delta: BTreeMap<GridPos, f32>,

    /// Замена биома (только на суше)
    #[serde(default, with = "cell_keys")]
    pub biome_override: BTreeMap<GridPos, Biome>,

    /// Принудительно добавляемые точки интереса
    #[serde(default)]
    pub poi_edits: Vec<PoiEdit>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.elevation_delta.is_empty() && self.biome_override.is_empty() && self.poi_edits.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_elevation_delta(&mut self, pos: GridPos, delta: f32) {
        self.elevation_delta.insert(pos, delta);
    }

    pub fn set_biome(&mut self, pos: GridPos, biome: Biome) {
        self.biome_override.insert(pos, biome);
    }

    pub fn push_poi(&mut self, edit: PoiEdit) {
        self.poi_edits.push(edit);
    }

    /// Клетки круглой кисти: X зацикливается, строки за краем отбрасываются.
    fn brush(center: GridPos, radius: u32, shape: GridShape) -> impl Iterator<Item = GridPos> {
        let r = radius as i32;
        (-r..=r).flat_map(move |oy| {
            (-r..=r).filter_map(move |ox| {
                if ox * ox + oy * oy > r * r {
                    return None;
                }
                let y = center.y + oy;
                if y < 0 || y >= shape.height as i32 {
                    return None;
                }
                let x = (center.x + ox).rem_euclid(shape.width as i32);
                Some(GridPos::new(x, y))
            })
        })
    }

    /// Поднимает (или опускает при `amount < 0`) рельеф кистью; дельты накапливаются.
    pub fn raise_area(&mut self, center: GridPos, radius: u32, amount: f32, shape: GridShape) {
        for pos in Self::brush(center, radius, shape) {
            *self.elevation_delta.entry(pos).or_insert(0.0) += amount;
        }
    }

    /// Закрашивает биом кистью.
    pub fn paint_biome_area(&mut self, center: GridPos, radius: u32, biome: Biome, shape: GridShape) {
        for pos in Self::brush(center, radius, shape) {
            self.biome_override.insert(pos, biome);
        }
    }
}

/// (Де)сериализация карт с ключами-клетками как JSON-объектов с ключами `"x,y"`.
mod cell_keys {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::grid::GridPos;

    pub fn serialize<S, V>(map: &BTreeMap<GridPos, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_map(map.iter().map(|(pos, v)| (pos.to_string(), v)))
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<GridPos, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, v)| key.parse::<GridPos>().map(|pos| (pos, v)).map_err(D::Error::custom))
            .collect()
    }
}
