//! Shared lake-monitoring fixtures.

/// Surface water temperature (°C) at one buoy, July of two consecutive years.
pub const JULY_TEMP_2023: [f64; 12] = [
    21.4, 22.0, 21.8, 22.5, 23.1, 22.7, 21.9, 22.3, 23.0, 22.8, 22.1, 21.6,
];
pub const JULY_TEMP_2024: [f64; 12] = [
    22.6, 23.2, 22.9, 23.8, 24.0, 23.5, 22.8, 23.4, 24.1, 23.9, 23.0, 22.7,
];

/// Total phosphorus (µg/L) at matched sites before and after a buffer strip was planted.
pub const PHOSPHORUS_BEFORE: [f64; 9] = [38.0, 42.5, 35.1, 40.2, 44.8, 39.9, 37.3, 41.0, 36.6];
pub const PHOSPHORUS_AFTER: [f64; 9] = [33.2, 40.1, 34.0, 35.5, 39.7, 38.8, 33.9, 37.2, 36.6];

/// Secchi depth (m), reported to 0.1 m so ties are frequent.
pub const SECCHI_BAY: [f64; 10] = [2.1, 2.3, 2.1, 2.4, 2.2, 2.3, 2.1, 2.5, 2.2, 2.3];
pub const SECCHI_MAIN_BASIN: [f64; 10] = [3.0, 2.8, 3.1, 2.9, 3.0, 2.7, 3.2, 2.9, 3.0, 2.8];

/// Rounded copy of `xs` at `decimals`, as a sensor export would report it.
pub fn rounded(xs: &[f64], decimals: i32) -> Vec<f64> {
    let scale = 10f64.powi(decimals);
    xs.iter().map(|x| (x * scale).round() / scale).collect()
}
