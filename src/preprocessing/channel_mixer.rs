//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::FeatureError;

/// Downmix interleaved multi-channel audio to mono
///
/// Each output sample is the arithmetic mean of one interleaved frame. A
/// trailing partial frame is dropped.
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, FeatureError> {
    if channels == 0 {
        return Err(FeatureError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let scale = 1.0 / channels as f32;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}
