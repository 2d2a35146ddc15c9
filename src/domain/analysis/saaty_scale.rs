//! Saaty's fundamental scale and random consistency indices.

/// The 17 admissible judgment values, ascending: 1/9 … 1/2, 1, 2 … 9.
pub const SAATY_SCALE: [f64; 17] = [
    1.0 / 9.0,
    1.0 / 8.0,
    1.0 / 7.0,
    1.0 / 6.0,
    1.0 / 5.0,
    1.0 / 4.0,
    1.0 / 3.0,
    1.0 / 2.0,
    1.0,
    2.0,
    3.0,
    4.0,
    5.0,
    6.0,
    7.0,
    8.0,
    9.0,
];

/// Smallest admissible judgment.
pub const SCALE_MIN: f64 = 1.0 / 9.0;

/// Largest admissible judgment.
pub const SCALE_MAX: f64 = 9.0;

/// Saaty's random index for matrix sizes 1..=15.
pub const RANDOM_INDEX: [f64; 15] = [
    0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

const SCALE_TOLERANCE: f64 = 1e-6;

/// Returns the random index for a matrix of size `n`.
///
/// Sizes above 15 reuse the n = 15 value; n = 0 yields 0.
pub fn random_index(n: usize) -> f64 {
    match n {
        0 => 0.0,
        n => RANDOM_INDEX[n.min(RANDOM_INDEX.len()) - 1],
    }
}

/// Returns true if `value` is one of the 17 scale points (within 1e-6 in log space).
pub fn is_on_scale(value: f64) -> bool {
    if !value.is_finite() || value <= 0.0 {
        return false;
    }
    let log_value = value.ln();
    SAATY_SCALE
        .iter()
        .any(|s| (s.ln() - log_value).abs() < SCALE_TOLERANCE)
}

/// Snaps a positive ratio to the nearest scale point, measured in log distance.
///
/// Values beyond the ends snap to 1/9 or 9. Non-positive or non-finite
/// input snaps to the neutral judgment 1.
pub fn snap_to_scale(ratio: f64) -> f64 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 1.0;
    }
    let target = ratio.ln();
    let mut best = 1.0;
    let mut best_distance = f64::INFINITY;
    for &candidate in SAATY_SCALE.iter() {
        let distance = (candidate.ln() - target).abs();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}
