//! Feature extraction modules
//!
//! This module contains the per-frame extractors:
//! - MFCC (timbre)
//! - Spectral centroid (brightness)
//! - Chroma (harmony, with tuning estimation)
//! - Onset strength and period estimation (tempo)

pub mod centroid;
pub mod chroma;
pub mod mfcc;
pub mod onset;
pub mod period;

use crate::error::FeatureError;

/// Check that every frame of a feature matrix has the expected width
///
/// # Errors
///
/// Returns `FeatureError::ShapeMismatch` naming the first offending width
pub fn check_frame_width(
    feature: &'static str,
    frames: &[Vec<f32>],
    expected: usize,
) -> Result<(), FeatureError> {
    match frames.iter().find(|frame| frame.len() != expected) {
        Some(frame) => Err(FeatureError::ShapeMismatch {
            feature,
            expected,
            found: frame.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_frame_width() {
        let frames = vec![vec![0.0f32; 12]; 4];
        assert!(check_frame_width("chroma", &frames, 12).is_ok());
        assert!(check_frame_width("chroma", &[], 12).is_ok());

        let mut bad = frames.clone();
        bad[2] = vec![0.0; 11];
        assert_eq!(
            check_frame_width("chroma", &bad, 12),
            Err(FeatureError::ShapeMismatch {
                feature: "chroma",
                expected: 12,
                found: 11
            })
        );
    }
}
