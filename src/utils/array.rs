//! Input array generation

use rand::Rng;

/// Generate `size` random integers in `min..=max` (bounds may be given in
/// either order).
pub fn generate_array(size: usize, min: i64, max: i64) -> Vec<i64> {
    generate_array_with(&mut rand::rng(), size, min, max)
}

/// Same as [`generate_array`] with a caller-supplied generator
pub fn generate_array_with<R: Rng + ?Sized>(rng: &mut R, size: usize, min: i64, max: i64) -> Vec<i64> {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    (0..size).map(|_| rng.random_range(low..=high)).collect()
}

/// Pick a search target that is guaranteed to be present: the middle element.
pub fn pick_target(values: &[i64]) -> Option<i64> {
    values.get(values.len() / 2).copied()
}
