// src/config.rs
//! Конфигурация генерации планеты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размер сетки и мастер-сид
//! - Доля океана и число тектонических плит
//! - Реки, фракции и поселения
//! - Климатические сдвиги и рельеф
//!
//! Структура поддерживает сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.
//! Чтение файлов — забота вызывающей стороны: ядро принимает уже прочитанный текст.

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::grid::GridShape;

/// Допустимый диапазон доли океана.
pub const OCEAN_PERCENT_RANGE: (f32, f32) = (0.05, 0.95);

/// Допустимый диапазон климатических сдвигов.
pub const BIAS_RANGE: (f32, f32) = (-0.3, 0.3);

/// Основные параметры генерации планеты
///
/// Полная конфигурация для генерации одного мира. Вместе с сидом и переопределениями
/// однозначно определяет результат.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Ключ пресета в таблице пресетов (по умолчанию `fantasy`)
    #[serde(default = "default_preset_key")]
    pub preset_key: String,

    /// Ширина сетки в клетках (по умолчанию 512)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота сетки в клетках (по умолчанию 256)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Мастер-сид; для хеширования используются младшие 32 бита
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,

    /// Доля клеток под океаном, прижимается к [0.05, 0.95]
    #[serde(default = "default_ocean_percent")]
    pub ocean_percent: f32,

    /// Число тектонических плит (не меньше 2)
    #[serde(default = "default_plate_count")]
    pub plate_count: u32,

    /// Сколько рек пытаемся проложить
    #[serde(default = "default_river_count")]
    pub river_count: u32,

    /// Максимальная длина одной реки в шагах
    #[serde(default = "default_river_max_steps")]
    pub river_max_steps: u32,

    /// Желаемое число фракций (0 = без фракций)
    #[serde(default = "default_faction_count")]
    pub faction_count: u32,

    /// Желаемое число поселений до поправки на плотность пресета
    #[serde(default = "default_settlement_count")]
    pub settlement_count: u32,

    /// Сила горных хребтов на границах плит:
    /// - `0.0` — хребтов нет,
    /// - `1.0` — стандартный рельеф,
    /// - `>1.0` — более резкие горы.
    #[serde(default = "default_ruggedness")]
    pub ruggedness: f32,

    /// Глобальный сдвиг температуры (-0.3 = холоднее, +0.3 = жарче)
    #[serde(default)]
    pub temperature_bias: f32,

    /// Глобальный сдвиг осадков (-0.3 = суше, +0.3 = влажнее)
    #[serde(default)]
    pub rainfall_bias: f32,

    /// Проходы сглаживания береговой линии (0 = без сглаживания)
    #[serde(default = "default_coast_smooth_iters")]
    pub coast_smooth_iters: u32,

    /// Минимальное расстояние между поселениями в клетках
    #[serde(default = "default_settlement_spacing")]
    pub settlement_spacing: u32,
}

fn default_preset_key() -> String {
    "fantasy".to_string()
}
fn default_width() -> u32 {
    512
}
fn default_height() -> u32 {
    256
}
fn default_master_seed() -> u64 {
    1337
}
fn default_ocean_percent() -> f32 {
    0.70
}
fn default_plate_count() -> u32 {
    18
}
fn default_river_count() -> u32 {
    220
}
fn default_river_max_steps() -> u32 {
    2600
}
fn default_faction_count() -> u32 {
    9
}
fn default_settlement_count() -> u32 {
    60
}
fn default_ruggedness() -> f32 {
    1.0
}
fn default_coast_smooth_iters() -> u32 {
    3
}
fn default_settlement_spacing() -> u32 {
    18
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            preset_key: default_preset_key(),
            width: default_width(),
            height: default_height(),
            master_seed: default_master_seed(),
            ocean_percent: default_ocean_percent(),
            plate_count: default_plate_count(),
            river_count: default_river_count(),
            river_max_steps: default_river_max_steps(),
            faction_count: default_faction_count(),
            settlement_count: default_settlement_count(),
            ruggedness: default_ruggedness(),
            temperature_bias: 0.0,
            rainfall_bias: 0.0,
            coast_smooth_iters: default_coast_smooth_iters(),
            settlement_spacing: default_settlement_spacing(),
        }
    }
}

impl PlanetConfig {
    /// Разбирает параметры из TOML-текста
    ///
    /// # Пример
    /// ```toml
    /// # planet.toml
    /// width = 256
    /// height = 128
    /// master_seed = 42
    /// ocean_percent = 0.6
    /// ```
    ///
    /// ```
    /// use planetgen::config::PlanetConfig;
    /// let cfg = PlanetConfig::from_toml_str("width = 256\nheight = 128\nmaster_seed = 42").unwrap();
    /// assert_eq!(cfg.width, 256);
    /// assert_eq!(cfg.plate_count, 18);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Сид для хеш-шума (младшие 32 бита мастер-сида).
    ///
    /// ```
    /// use planetgen::config::PlanetConfig;
    /// let cfg = PlanetConfig { master_seed: 0x1_0000_0005, ..PlanetConfig::default() };
    /// assert_eq!(cfg.seed32(), 5);
    /// ```
    #[must_use]
    pub fn seed32(&self) -> u32 {
        (self.master_seed & 0xFFFF_FFFF) as u32
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    /// Проверяет конфигурацию и прижимает параметры к допустимым диапазонам.
    ///
    /// # Ошибки
    /// - нулевая ширина или высота, слишком большая сетка;
    /// - нечисловые (`NaN`, бесконечные) вещественные параметры.
    ///
    /// Всё остальное не отвергается, а прижимается: доля океана к [0.05, 0.95],
    /// сдвиги к [-0.3, 0.3], число плит не меньше 2, `ruggedness` не меньше 0.
    pub fn normalized(&self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .filter(|&n| n <= i32::MAX as usize)
            .ok_or(GenerationError::GridTooLarge {
                width: self.width,
                height: self.height,
            })?;

        for (name, value) in [
            ("ocean_percent", self.ocean_percent),
            ("ruggedness", self.ruggedness),
            ("temperature_bias", self.temperature_bias),
            ("rainfall_bias", self.rainfall_bias),
        ] {
            if !value.is_finite() {
                return Err(GenerationError::InvalidTunable { name, value });
            }
        }

        Ok(Self {
            ocean_percent: self
                .ocean_percent
                .clamp(OCEAN_PERCENT_RANGE.0, OCEAN_PERCENT_RANGE.1),
            plate_count: self.plate_count.max(2),
            ruggedness: self.ruggedness.max(0.0),
            temperature_bias: self.temperature_bias.clamp(BIAS_RANGE.0, BIAS_RANGE.1),
            rainfall_bias: self.rainfall_bias.clamp(BIAS_RANGE.0, BIAS_RANGE.1),
            settlement_spacing: self.settlement_spacing.max(1),
            ..self.clone()
        })
    }
}
