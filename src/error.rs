//! Ошибки генерации мира
//!
//! Все fallible-операции крейта возвращают [`GenerationError`] через псевдоним [`Result`].
//! Ошибки делятся на две группы: некорректная конфигурация и некорректные внешние таблицы.
//! Числовые помощники (хеши, шум) не возвращают ошибок вовсе.

/// Ошибки, возникающие при подготовке входных данных и генерации мира.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Нулевая ширина или высота сетки.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Запрошенная ширина.
        width: u32,
        /// Запрошенная высота.
        height: u32,
    },

    /// Произведение ширины на высоту не помещается в `usize`.
    #[error("grid {width}x{height} is too large")]
    GridTooLarge {
        /// Запрошенная ширина.
        width: u32,
        /// Запрошенная высота.
        height: u32,
    },

    /// Вещественный параметр не является конечным числом.
    #[error("tunable `{name}` must be finite, got {value}")]
    InvalidTunable {
        /// Имя поля конфигурации.
        name: &'static str,
        /// Полученное значение.
        value: f32,
    },

    /// Конфигурация не разбирается как TOML.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Таблица не разбирается как JSON (в том числе отсутствуют обязательные поля).
    #[error("failed to parse data table: {0}")]
    TableParse(#[from] serde_json::Error),

    /// В таблице пресетов нет ни запрошенного, ни запасного пресета.
    #[error("preset `{0}` not found and no `fantasy` fallback present")]
    MissingPreset(String),

    /// Таблица разобрана, но содержит недопустимые значения.
    #[error("invalid {table} table: {reason}")]
    InvalidTable {
        /// Имя таблицы.
        table: &'static str,
        /// Описание проблемы.
        reason: String,
    },

    /// Неизвестный идентификатор биома.
    #[error("unknown biome `{0}`")]
    InvalidBiome(String),

    /// Ключ клетки не в формате `"x,y"`.
    #[error("invalid cell key `{0}`, expected \"x,y\"")]
    InvalidCellKey(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
