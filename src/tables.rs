//! Внешние таблицы: пресеты миров и пулы названий точек интереса
//!
//! Загрузка файлов — забота вызывающей стороны; здесь только разбор уже прочитанного JSON
//! и проверка полноты. Неполная таблица — ошибка, частичный мир не строится.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Пресет, который используется, если запрошенного ключа нет.
pub const FALLBACK_PRESET: &str = "fantasy";

/// Параметры цивилизации для типа мира
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Отображаемое имя пресета
    #[serde(default)]
    pub name: Option<String>,

    /// Уровень цивилизации:
    /// - `0` — дикий мир (нет поселений, меньше фракций),
    /// - `>0` — поселения, дороги и цивилизационные точки интереса.
    pub civ_level: i32,

    /// Множитель числа поселений
    pub settlement_density: f32,

    /// Плотность руин (доля от числа природных точек интереса)
    pub ruins_density: f32,

    /// Опасности мира (только для потребителей, генерацию не меняют)
    #[serde(default)]
    pub hazards: Vec<String>,

    /// Стиль фракций (`feudal`, `tribal`, ...)
    #[serde(default = "default_faction_style")]
    pub faction_style: String,
}

fn default_faction_style() -> String {
    "feudal".to_string()
}

impl Preset {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("settlement_density", self.settlement_density),
            ("ruins_density", self.ruins_density),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GenerationError::InvalidTable {
                    table: "presets",
                    reason: format!("{field} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn has_civilization(&self) -> bool {
        self.civ_level > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetTable {
    pub presets: BTreeMap<String, Preset>,
}

impl PresetTable {
    /// Разбирает `{"presets": {"<key>": {...}}}`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(text)?;
        for preset in table.presets.values() {
            preset.validate()?;
        }
        Ok(table)
    }

    /// Пресет по ключу; неизвестный ключ откатывается на `fantasy`.
    pub fn resolve(&self, key: &str) -> Result<&Preset> {
        self.presets
            .get(key)
            .or_else(|| self.presets.get(FALLBACK_PRESET))
            .ok_or_else(|| GenerationError::MissingPreset(key.to_string()))
    }
}

/// Пулы названий точек интереса по категориям
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiPools {
    pub natural: Vec<String>,
    pub civilization: Vec<String>,
    pub catastrophe: Vec<String>,
}

impl PoiPools {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Названия руин из цивилизационного пула; если таких нет, то весь пул.
    pub fn ruins(&self) -> Vec<String> {
        let ruins: Vec<String> = self
            .civilization
            .iter()
            .filter(|name| ["Ruins", "Abandoned", "Collapsed"].iter().any(|w| name.contains(w)))
            .cloned()
            .collect();
        if ruins.is_empty() {
            self.civilization.clone()
        } else {
            ruins
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: &str = r#"{
        "presets": {
            "fantasy": {"name": "Fantasy", "civ_level": 2, "settlement_density": 1.0,
                        "ruins_density": 0.25, "hazards": ["dragons"], "faction_style": "feudal"},
            "wild": {"civ_level": 0, "settlement_density": 0.0, "ruins_density": 0.1}
        }
    }"#;

    #[test]
    fn presets_resolve_with_fallback() {
        let table = PresetTable::from_json_str(PRESETS).unwrap();
        assert_eq!(table.resolve("wild").unwrap().civ_level, 0);
        assert_eq!(table.resolve("wild").unwrap().faction_style, "feudal");
        assert_eq!(table.resolve("nope").unwrap().name.as_deref(), Some("Fantasy"));
        assert!(table.resolve("fantasy").unwrap().has_civilization());
    }

    #[test]
    fn missing_fallback_is_a_data_error() {
        let table = PresetTable::from_json_str(
            r#"{"presets": {"wild": {"civ_level": 0, "settlement_density": 0.0, "ruins_density": 0.0}}}"#,
        )
        .unwrap();
        assert!(matches!(table.resolve("nope"), Err(GenerationError::MissingPreset(_))));
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let err = PresetTable::from_json_str(r#"{"presets": {"fantasy": {"civ_level": 1}}}"#).unwrap_err();
        assert!(matches!(err, GenerationError::TableParse(_)));
        let err = PoiPools::from_json_str(r#"{"natural": [], "civilization": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::TableParse(_)));
    }

    #[test]
    fn negative_density_is_rejected() {
        let err = PresetTable::from_json_str(
            r#"{"presets": {"fantasy": {"civ_level": 1, "settlement_density": -1.0, "ruins_density": 0.0}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidTable { table: "presets", .. }));
    }

    #[test]
    fn ruins_filter_falls_back_to_whole_pool() {
        let pools = PoiPools {
            natural: vec![],
            civilization: vec!["Old Ruins".into(), "Market".into(), "Abandoned Mine".into()],
            catastrophe: vec![],
        };
        assert_eq!(pools.ruins(), vec!["Old Ruins".to_string(), "Abandoned Mine".to_string()]);
        let plain = PoiPools {
            civilization: vec!["Market".into()],
            ..PoiPools::default()
        };
        assert_eq!(plain.ruins(), vec!["Market".to_string()]);
    }
}
