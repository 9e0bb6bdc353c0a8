//! Window functions

use std::f32::consts::PI;

/// Periodic Hann window of length `size`
///
/// `w[n] = 0.5 - 0.5 * cos(2πn / size)`. The periodic form (rather than the
/// symmetric one) is the one that tiles exactly under 75 % overlap.
pub fn hann_window(size: usize) -> Vec<f32> {
    if size == 0 {
        return Vec::new();
    }
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / size as f32).cos())
        .collect()
}
