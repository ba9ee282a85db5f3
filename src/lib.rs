pub mod biome;
pub mod civilization;
pub mod climate;
pub mod config;
pub mod error;
pub mod grid;
pub mod heightmap;
pub mod noise;
pub mod overrides;
pub mod plates;
pub mod poi;
pub mod rivers;
pub mod tables;
pub mod water;
pub mod world;

pub use biome::Biome;
pub use civilization::{Road, Settlement, SettlementKind};
pub use config::PlanetConfig;
pub use error::{GenerationError, Result};
pub use grid::{GridPos, GridShape};
pub use overrides::Overrides;
pub use poi::{Poi, PoiCategory, PoiEdit};
pub use tables::{PoiPools, Preset, PresetTable};
pub use world::{World, WorldSummary, generate_world};
