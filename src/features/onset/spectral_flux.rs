//! Spectral flux onset strength
//!
//! Half-wave rectified first difference of the log-mel spectrogram, averaged
//! over mel bands.
//!
//! # Reference
//!
//! Böck, S., & Widmer, G. (2013). Maximum Filter Vibrato Suppression for
//! Onset Detection. *Proceedings of the 16th International Conference on
//! Digital Audio Effects (DAFx)*.

use crate::error::FeatureError;

/// Compute the onset strength envelope
///
/// `env[t] = mean_m max(0, S[t + 1][m] - S[t][m])` over mel bands `m`.
///
/// # Arguments
///
/// * `log_mel` - Log-mel spectrogram in dB (n_frames × n_mels)
///
/// # Returns
///
/// Envelope of length `n_frames - 1` (empty for fewer than 2 frames)
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` if frames have inconsistent lengths
pub fn onset_strength(log_mel: &[Vec<f32>]) -> Result<Vec<f32>, FeatureError> {
    if log_mel.len() < 2 {
        return Ok(Vec::new());
    }

    let n_mels = log_mel[0].len();
    if n_mels == 0 {
        return Err(FeatureError::InvalidInput("Empty mel frames".to_string()));
    }

    for (i, frame) in log_mel.iter().enumerate() {
        if frame.len() != n_mels {
            return Err(FeatureError::InvalidInput(format!(
                "Inconsistent frame lengths: frame 0 has {} bands, frame {} has {} bands",
                n_mels,
                i,
                frame.len()
            )));
        }
    }

    let envelope: Vec<f32> = log_mel
        .windows(2)
        .map(|pair| {
            let rise: f32 = pair[1]
                .iter()
                .zip(&pair[0])
                .map(|(&curr, &prev)| (curr - prev).max(0.0))
                .sum();
            rise / n_mels as f32
        })
        .collect();

    log::debug!("Onset strength envelope: {} values", envelope.len());

    Ok(envelope)
}
