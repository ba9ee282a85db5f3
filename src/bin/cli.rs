use clap::Parser;
use planetgen::{Overrides, PlanetConfig, PoiPools, PresetTable, generate_world};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор планет для Campaign Forge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: PathBuf,

    /// Таблица пресетов (JSON)
    #[arg(short, long)]
    presets: PathBuf,

    /// Пулы названий точек интереса (JSON)
    #[arg(long)]
    pois: PathBuf,

    /// Ручные правки (JSON)
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Куда сохранить мир в JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    tracing::info!(path = %cli.config.display(), "loading configuration");
    let config = PlanetConfig::from_toml_str(&fs::read_to_string(&cli.config)?)?;
    let presets = PresetTable::from_json_str(&fs::read_to_string(&cli.presets)?)?;
    let pools = PoiPools::from_json_str(&fs::read_to_string(&cli.pois)?)?;
    let overrides: Overrides = match &cli.overrides {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Overrides::default(),
    };

    let preset = presets.resolve(&config.preset_key)?;
    let world = generate_world(&config, preset, &pools, &overrides)?;

    let summary = world.summary();
    tracing::info!(
        preset = %summary.preset_name,
        style = %summary.faction_style,
        width = world.width(),
        height = world.height(),
        land = %format!("{:.1}%", summary.land_fraction * 100.0),
        factions = summary.factions,
        settlements = summary.settlements,
        roads = summary.roads,
        pois = summary.pois,
        rivers = summary.river_sources,
        "summary"
    );
    for (biome, count) in &summary.biome_counts {
        tracing::debug!(%biome, count, "biome");
    }

    if let Some(path) = &cli.output {
        fs::write(path, serde_json::to_string(&world)?)?;
        tracing::info!(path = %path.display(), "world saved");
    }

    Ok(())
}
