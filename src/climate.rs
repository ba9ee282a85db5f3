use crate::config::PlanetConfig;
use crate::grid::GridShape;
use crate::noise::fbm_noise;

#[derive(Debug, Clone, PartialEq)]
pub struct ClimateMaps {
    pub temperature: Vec<f32>,
    pub moisture: Vec<f32>,
}

/// Входные поля, от которых зависит климат.
#[derive(Debug, Clone, Copy)]
pub struct ClimateInputs<'a> {
    pub elevation: &'a [f32],
    pub ocean_threshold: f32,
    pub coast_distance: &'a [u32],
    pub ridge: &'a [f32],
}

/// Температура: широта минус высотный градиент плюс сдвиг
pub fn temperature_at(latitude: f32, elevation: f32, ocean_threshold: f32, bias: f32) -> f32 {
    let base = 1.0 - latitude.abs();
    // Высотный градиент: выше уровня моря холоднее, в глубинах чуть теплее
    let lapse = ((elevation - ocean_threshold) * 0.35).clamp(-0.3, 0.45);
    (base - lapse + bias).clamp(0.0, 1.0)
}

/// Бонус влажности у побережья: линейно спадает до нуля на 40 клетках
pub fn coast_bonus(distance: u32) -> f32 {
    (1.0 - distance as f32 / 40.0).clamp(0.0, 1.0) * 0.25
}

/// Генерирует карты температуры и влажности
pub fn generate_climate_maps(shape: GridShape, config: &PlanetConfig, inputs: ClimateInputs<'_>) -> ClimateMaps {
    let seed = config.seed32().wrapping_add(303);
    let mscale = 2.2 / shape.width.min(shape.height).max(128) as f32;

    let mut temperature = vec![0.0; shape.len()];
    let mut moisture = vec![0.0; shape.len()];

    for y in 0..shape.height {
        let lat = shape.latitude(y);
        for x in 0..shape.width {
            let idx = shape.index(x, y);

            temperature[idx] = temperature_at(
                lat,
                inputs.elevation[idx],
                inputs.ocean_threshold,
                config.temperature_bias,
            );

            let n = fbm_noise(x as f32 * mscale, y as f32 * mscale, seed, 5, 2.0, 0.5);
            let mut m = (n - 0.5) * 0.9 + 0.55;
            m += coast_bonus(inputs.coast_distance[idx]);
            // Дождевая тень за хребтами
            m -= (inputs.ridge[idx] * 0.15).clamp(0.0, 0.15);
            m += config.rainfall_bias;
            moisture[idx] = m.clamp(0.0, 1.0);
        }
    }

    ClimateMaps {
        temperature,
        moisture,
    }
}
