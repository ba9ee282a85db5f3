//! Хеш-шум: единственный источник случайности генератора
//!
//! Все функции чистые: одинаковые аргументы всегда дают одинаковый результат.
//! Арифметика 32-битная с переполнением по модулю 2^32.

/// Перемешивание 32-битного слова (лавинный эффект).
#[must_use]
pub fn hash32(x: u32) -> u32 {
    let mut x = x;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Хеш узла целочисленной решётки.
#[must_use]
pub fn hash2(seed: u32, x: i32, y: i32) -> u32 {
    let lattice = (x as u32)
        .wrapping_mul(374_761_393)
        .wrapping_add((y as u32).wrapping_mul(668_265_263));
    hash32(seed ^ hash32(lattice))
}

/// Псевдослучайное число в [0, 1] для узла решётки.
#[must_use]
pub fn rand01(seed: u32, x: i32, y: i32) -> f32 {
    (f64::from(hash2(seed, x, y)) / f64::from(u32::MAX)) as f32
}

/// Случайная координата в `0..extent` для `k`-й попытки выборки.
///
/// `rand01` может вернуть ровно 1.0, поэтому результат прижимается к `extent - 1`.
#[must_use]
pub fn sample_coord(seed: u32, k: u32, salt: i32, extent: u32) -> u32 {
    let r = rand01(seed, k as i32, salt);
    ((r * extent as f32) as u32).min(extent.saturating_sub(1))
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Value-шум: билинейная интерполяция (со smoothstep) четырёх узлов решётки.
#[must_use]
pub fn value_noise_2d(x: f32, y: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);
    let (xi, yi) = (x0 as i32, y0 as i32);

    let v00 = rand01(seed, xi, yi);
    let v10 = rand01(seed, xi.wrapping_add(1), yi);
    let v01 = rand01(seed, xi, yi.wrapping_add(1));
    let v11 = rand01(seed, xi.wrapping_add(1), yi.wrapping_add(1));

    let a = lerp(v00, v10, tx);
    let b = lerp(v01, v11, tx);
    lerp(a, b, ty)
}

/// Фрактальный шум (fBm): нормированная сумма октав value-шума.
///
/// Каждая октава использует собственный сид (`seed + i * 1013`), результат лежит в [0, 1].
/// `octaves == 0` трактуется как одна октава.
#[must_use]
pub fn fbm_noise(x: f32, y: f32, seed: u32, octaves: u32, lacunarity: f32, gain: f32) -> f32 {
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut sum = 0.0;
    let mut norm = 0.0;
    for i in 0..octaves.max(1) {
        let octave_seed = seed.wrapping_add(i.wrapping_mul(1013));
        sum += amp * value_noise_2d(x * freq, y * freq, octave_seed);
        norm += amp;
        amp *= gain;
        freq *= lacunarity;
    }
    if norm > 0.0 { sum / norm } else { 0.0 }
}
