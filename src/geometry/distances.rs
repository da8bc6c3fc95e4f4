//! Distance calculations for atomic structures

/// Euclidean distance between two 3D points
#[inline]
pub fn euclidean_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    euclidean_distance_squared(a, b).sqrt()
}

/// Squared Euclidean distance (faster when only comparing distances)
#[inline]
pub fn euclidean_distance_squared(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
