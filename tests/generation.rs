use planetgen::civilization::place_faction_cores;
use planetgen::{
    Biome, GenerationError, GridPos, GridShape, Overrides, PlanetConfig, PoiCategory, PoiEdit, PoiPools, Preset,
    PresetTable, World, generate_world,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PRESETS: &str = r#"{
    "presets": {
        "fantasy": {
            "name": "High Fantasy",
            "civ_level": 3,
            "settlement_density": 1.0,
            "ruins_density": 0.3,
            "hazards": ["dragons", "blight"],
            "faction_style": "feudal"
        },
        "wild": {
            "civ_level": 0,
            "settlement_density": 0.0,
            "ruins_density": 0.0
        },
        "apocalypse": {
            "civ_level": 1,
            "settlement_density": 0.5,
            "ruins_density": 0.8,
            "faction_style": "warband"
        }
    }
}"#;

const POOLS: &str = r#"{
    "natural": ["Crystal Cave", "Weeping Falls", "Giant's Stair"],
    "civilization": ["Toll Bridge", "Abandoned Mine", "Collapsed Tower", "Market Cross"],
    "catastrophe": ["Crater", "Plague Pit"]
}"#;

fn small_config(seed: u64) -> PlanetConfig {
    PlanetConfig {
        width: 64,
        height: 32,
        master_seed: seed,
        plate_count: 6,
        river_count: 12,
        faction_count: 4,
        settlement_count: 10,
        settlement_spacing: 8,
        ..PlanetConfig::default()
    }
}

fn tables() -> (PresetTable, PoiPools) {
    (
        PresetTable::from_json_str(PRESETS).unwrap(),
        PoiPools::from_json_str(POOLS).unwrap(),
    )
}

fn generate(config: &PlanetConfig, overrides: &Overrides) -> World {
    let (presets, pools) = tables();
    let preset = presets.resolve(&config.preset_key).unwrap();
    generate_world(config, preset, &pools, overrides).unwrap()
}

fn sweep_seeds(count: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    (0..count).map(|_| rng.next_u64()).collect()
}

fn assert_ocean_fraction(world: &World) {
    let n = world.shape().len();
    let ocean = world.ocean().iter().filter(|&&o| o).count() as i64;
    let target = (f64::from(world.config().ocean_percent) * n as f64).round() as i64;
    assert!((ocean - target).abs() <= 1, "{ocean} ocean cells, expected {target}");
}

fn assert_invariants(world: &World) {
    let shape = world.shape();
    let n = shape.len();
    assert_eq!(world.elevation().len(), n);
    assert_eq!(world.temperature().len(), n);
    assert_eq!(world.moisture().len(), n);
    assert_eq!(world.coast_distance().len(), n);
    assert!(world.ocean_threshold().is_finite());
    assert!(world.ridge().iter().all(|&r| (0.0..=1.0).contains(&r)));
    assert!(world.elevation().iter().all(|e| e.is_finite()));
    assert_ocean_fraction(world);

    for i in 0..n {
        let ocean = world.ocean()[i];
        let biome = world.biome()[i];
        assert_eq!(ocean, biome.is_ocean(), "cell {i}: ocean={ocean} biome={biome}");

        let river = world.river_intensity()[i];
        if river > 0 {
            assert!(!ocean);
            assert_eq!(biome, Biome::River);
        }

        let s = world.faction_strength()[i];
        assert!((0.0..=1.0).contains(&s));
        if s > 0.0 {
            assert!(world.faction_id()[i] >= 0);
        }

        assert!((0.0..=1.0).contains(&world.temperature()[i]));
        assert!((0.0..=1.0).contains(&world.moisture()[i]));
    }

    let spacing = i64::from(world.config().settlement_spacing);
    let settlements = world.settlements();
    for (i, a) in settlements.iter().enumerate() {
        assert!(!world.ocean()[shape.checked_index(a.position).unwrap()]);
        for b in &settlements[i + 1..] {
            assert!(shape.wrapped_dist2(a.position, b.position) >= spacing * spacing);
        }
    }
    for poi in world.pois() {
        assert!(!world.ocean()[shape.checked_index(poi.position).unwrap()]);
    }
}

#[test]
fn same_inputs_give_the_same_world() {
    let config = small_config(1337);
    let mut overrides = Overrides::default();
    overrides.set_elevation_delta(GridPos::new(3, 3), 0.4);
    let a = generate(&config, &overrides);
    let b = generate(&config, &overrides);
    assert_eq!(a, b);
}

#[test]
fn ocean_fraction_tracks_the_percentile() {
    let mut seeds = sweep_seeds(12);
    seeds.push(6);
    for seed in seeds {
        for p in [0.05_f32, 0.3, 0.5, 0.7, 0.95] {
            let config = PlanetConfig {
                ocean_percent: p,
                ..small_config(seed)
            };
            let world = generate(&config, &Overrides::default());
            assert!(world.elevation().iter().all(|e| e.is_finite()), "seed {seed} p {p}");
            assert!(world.temperature().iter().all(|t| t.is_finite()), "seed {seed} p {p}");
            assert_ocean_fraction(&world);
        }
    }
}

#[test]
fn default_size_worlds_stay_finite() {
    for seed in [0, 1, 2] {
        let config = PlanetConfig {
            master_seed: seed,
            ..PlanetConfig::default()
        };
        let world = generate(&config, &Overrides::default());
        assert_eq!(world.shape().len(), 512 * 256);
        assert!(world.ridge().iter().all(|&r| r >= 0.0), "seed {seed}");
        assert!(world.elevation().iter().all(|e| e.is_finite()), "seed {seed}");
        assert!(world.temperature().iter().all(|t| t.is_finite()), "seed {seed}");
        assert_invariants(&world);
    }
}

#[test]
fn invariants_hold_across_seeds_and_presets() {
    for seed in sweep_seeds(3) {
        for key in ["fantasy", "wild", "apocalypse"] {
            let config = PlanetConfig {
                preset_key: key.to_string(),
                ..small_config(seed)
            };
            assert_invariants(&generate(&config, &Overrides::default()));
        }
    }
}

#[test]
fn faction_cores_hold_full_strength() {
    let world = generate(&small_config(99), &Overrides::default());
    let shape = world.shape();
    for (fid, core) in world.faction_cores().iter().enumerate() {
        let idx = shape.checked_index(*core).unwrap();
        assert_eq!(world.faction_id()[idx], fid as i32);
        assert!((world.faction_strength()[idx] - 1.0).abs() < 1e-6);
    }
}

#[test]
fn coast_distance_is_continuous_across_the_seam() {
    let world = generate(&small_config(2024), &Overrides::default());
    let shape = world.shape();
    assert!(shape.wrapped_dx(0, shape.width as i32 - 1) <= shape.width as i32 / 2);
    for y in 0..shape.height {
        let left = world.coast_distance()[shape.index(0, y)];
        let right = world.coast_distance()[shape.index(shape.width - 1, y)];
        assert!(left.abs_diff(right) <= 1, "row {y}: {left} vs {right}");
    }
}

#[test]
fn repeated_overrides_do_not_accumulate() {
    let config = small_config(7);
    let mut once = Overrides::default();
    once.set_elevation_delta(GridPos::new(10, 10), 0.5);
    once.set_biome(GridPos::new(5, 5), Biome::Desert);

    let mut twice = once.clone();
    twice.set_elevation_delta(GridPos::new(10, 10), 0.5);
    twice.set_biome(GridPos::new(5, 5), Biome::Desert);
    assert_eq!(once, twice);

    assert_eq!(generate(&config, &once), generate(&config, &twice));
}

#[test]
fn overrides_survive_a_json_round_trip() {
    let config = small_config(11);
    let overrides: Overrides = serde_json::from_str(
        r#"{
            "elevation_delta": {"10,10": 0.75, "500,3": 1.0},
            "biome_override": {"5,5": "desert"},
            "poi_edits": [{"x": 2, "y": 3, "name": "Hermit Hut"}]
        }"#,
    )
    .unwrap();
    let text = serde_json::to_string(&overrides).unwrap();
    let back: Overrides = serde_json::from_str(&text).unwrap();
    assert_eq!(back, overrides);
    assert_eq!(generate(&config, &back), generate(&config, &overrides));
}

#[test]
fn empty_civilization_world() {
    let config = PlanetConfig {
        width: 64,
        height: 32,
        master_seed: 42,
        ocean_percent: 0.7,
        plate_count: 6,
        river_count: 5,
        faction_count: 0,
        settlement_count: 0,
        ..PlanetConfig::default()
    };
    let world = generate(&config, &Overrides::default());
    let ocean = world.ocean().iter().filter(|&&o| o).count() as i64;
    assert!((ocean - (f64::from(0.7_f32) * 2048.0).round() as i64).abs() <= 1);
    assert!(world.faction_cores().is_empty());
    assert!(world.faction_id().iter().all(|&f| f == -1));
    assert!(world.settlements().is_empty());
    assert!(world.roads().is_empty());
    assert!(world.river_sources().len() <= 5);
    assert_invariants(&world);
}

#[test]
fn raised_ocean_cell_becomes_land() {
    let target = GridPos::new(10, 10);
    let (seed, base) = (0..64)
        .map(|seed| (seed, generate(&small_config(seed), &Overrides::default())))
        .find(|(_, world)| world.ocean()[world.shape().checked_index(target).unwrap()])
        .expect("some seed puts (10,10) under water");
    let idx = base.shape().checked_index(target).unwrap();
    assert!(base.ocean_threshold() - base.elevation()[idx] < 5.0);

    let mut overrides = Overrides::default();
    overrides.set_elevation_delta(target, 5.0);
    let raised = generate(&small_config(seed), &overrides);
    assert!(!raised.ocean()[idx]);
    assert!(!raised.biome()[idx].is_ocean());
}

#[test]
fn biome_override_paints_land_only() {
    let target = GridPos::new(5, 5);
    let mut overrides = Overrides::default();
    overrides.set_biome(target, Biome::Desert);

    let (mut saw_land, mut saw_ocean) = (false, false);
    for seed in 0..64 {
        let world = generate(&small_config(seed), &overrides);
        let idx = world.shape().checked_index(target).unwrap();
        if world.ocean()[idx] {
            saw_ocean = true;
            assert!(matches!(world.biome()[idx], Biome::Ocean | Biome::SeaIce));
        } else {
            saw_land = true;
            assert_eq!(world.biome()[idx], Biome::Desert);
        }
        if saw_land && saw_ocean {
            break;
        }
    }
    assert!(saw_land);
}

#[test]
fn different_seeds_give_different_terrain() {
    let a = generate(&small_config(1), &Overrides::default());
    let b = generate(&small_config(2), &Overrides::default());
    assert_ne!(a.elevation(), b.elevation());
    assert_invariants(&a);
    assert_invariants(&b);
}

#[test]
fn drowned_world_is_not_an_error() {
    let config = PlanetConfig {
        ocean_percent: 0.999,
        faction_count: 3,
        ..small_config(5)
    };
    let world = generate(&config, &Overrides::default());
    assert!((world.config().ocean_percent - 0.95).abs() < f32::EPSILON);
    assert!(world.faction_cores().len() <= 3);

    let shape = GridShape::new(64, 32);
    let elevation = vec![-1.0; shape.len()];
    let ocean = vec![true; shape.len()];
    assert!(place_faction_cores(shape, 5, &elevation, &ocean, 0.0, 3).is_empty());
}

#[test]
fn forced_points_of_interest_are_appended() {
    let config = small_config(3);
    let base = generate(&config, &Overrides::default());
    let shape = base.shape();
    let land = (0..shape.len()).find(|&i| !base.ocean()[i]).unwrap();
    let pos = shape.position(land);

    let mut overrides = Overrides::default();
    overrides.push_poi(PoiEdit {
        notes: " watch the bridge ".to_string(),
        ..PoiEdit::new(pos.x, pos.y, "Hermit Hut")
    });
    let world = generate(&config, &overrides);
    let last = world.pois().last().unwrap();
    assert_eq!(last.position, pos);
    assert_eq!(last.name, "Hermit Hut");
    assert_eq!(last.category, PoiCategory::Custom);
    assert_eq!(last.biome, world.biome()[land]);
    assert_eq!(last.notes.as_deref(), Some("watch the bridge"));
}

#[test]
fn wild_preset_has_no_settlements_or_civilization_pois() {
    let config = PlanetConfig {
        preset_key: "wild".to_string(),
        ..small_config(8)
    };
    let world = generate(&config, &Overrides::default());
    assert!(world.settlements().is_empty());
    assert!(world.faction_cores().len() <= 2);
    assert!(world.pois().iter().all(|p| p.category != PoiCategory::Civilization));
}

#[test]
fn unknown_preset_falls_back_and_broken_tables_fail() {
    let (presets, _) = tables();
    assert_eq!(presets.resolve("steampunk").unwrap().name.as_deref(), Some("High Fantasy"));

    let err = PresetTable::from_json_str(r#"{"presets": {"fantasy": {"civ_level": 1}}}"#).unwrap_err();
    assert!(matches!(err, GenerationError::TableParse(_)));

    let err = PoiPools::from_json_str(r#"{"natural": [], "civilization": []}"#).unwrap_err();
    assert!(matches!(err, GenerationError::TableParse(_)));

    let empty = PresetTable::from_json_str(r#"{"presets": {}}"#).unwrap();
    assert!(matches!(empty.resolve("wild"), Err(GenerationError::MissingPreset(_))));
}

#[test]
fn empty_pools_fall_back_to_numbered_names() {
    let (presets, _) = tables();
    let preset: &Preset = presets.resolve("fantasy").unwrap();
    let world = generate_world(&small_config(21), preset, &PoiPools::default(), &Overrides::default()).unwrap();
    assert!(!world.pois().is_empty());
    assert!(world.pois().iter().all(|p| p.name.starts_with("POI-")));
}
