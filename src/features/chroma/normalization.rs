//! Chroma normalization strategies

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Normalize a chroma vector in-place so that its largest bin is 1.0
///
/// Vectors whose maximum is (numerically) zero are left untouched, so silent
/// frames stay all-zero.
pub fn normalize_max_in_place(chroma: &mut [f32]) {
    let max = chroma.iter().copied().fold(0.0f32, f32::max);
    if max > EPSILON {
        for v in chroma.iter_mut() {
            *v /= max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_becomes_one() {
        let mut chroma = vec![0.0, 2.0, 4.0, 1.0];
        normalize_max_in_place(&mut chroma);
        assert_eq!(chroma, vec![0.0, 0.5, 1.0, 0.25]);
    }

    #[test]
    fn test_zero_vector_untouched() {
        let mut chroma = vec![0.0f32; 12];
        normalize_max_in_place(&mut chroma);
        assert!(chroma.iter().all(|&v| v == 0.0));
    }
}
