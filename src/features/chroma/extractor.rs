//! Chroma vector extraction
//!
//! Converts an STFT magnitude spectrogram to 12-element chroma vectors.
//!
//! # Example
//!
//! ```
//! use stratum_features::features::chroma::extractor::extract_chroma;
//! use stratum_features::spectral::stft::compute_stft;
//!
//! let samples: Vec<f32> = (0..22050)
//!     .map(|i| (2.0 * std::f32::consts::PI * 261.63 * i as f32 / 22050.0).sin())
//!     .collect();
//! let spec = compute_stft(&samples, 22050, 2048, 512)?;
//! let chroma = extract_chroma(&spec, 12)?;
//! assert!(chroma.iter().all(|frame| frame.len() == 12));
//! # Ok::<(), stratum_features::FeatureError>(())
//! ```

use super::filterbank::chroma_filterbank;
use super::normalization::normalize_max_in_place;
use super::tuning::estimate_tuning;
use crate::error::FeatureError;
use crate::spectral::stft::Spectrogram;

/// Extract chroma vectors from a magnitude spectrogram
///
/// The tuning deviation is estimated from the spectrogram itself, the power
/// spectrogram is projected onto a tuning-corrected chroma filterbank, and
/// every frame is scaled so its strongest pitch class is 1.0.
///
/// # Arguments
///
/// * `spectrogram` - STFT magnitude spectrogram
/// * `n_chroma` - Number of chroma bins (12)
///
/// # Returns
///
/// Vector of `n_chroma`-element chroma vectors (one per frame)
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` if the filterbank cannot be built
pub fn extract_chroma(
    spectrogram: &Spectrogram,
    n_chroma: usize,
) -> Result<Vec<Vec<f32>>, FeatureError> {
    log::debug!(
        "Extracting chroma: {} frames at {} Hz",
        spectrogram.n_frames(),
        spectrogram.sample_rate()
    );

    if spectrogram.n_frames() == 0 {
        return Ok(Vec::new());
    }

    let tuning = estimate_tuning(spectrogram);
    let filterbank = chroma_filterbank(
        spectrogram.sample_rate(),
        spectrogram.frame_size(),
        n_chroma,
        tuning,
    )?;

    Ok(spectrogram
        .power_frames()
        .iter()
        .map(|power| {
            let mut chroma: Vec<f32> = filterbank
                .iter()
                .map(|weights| weights.iter().zip(power).map(|(&w, &p)| w * p).sum())
                .collect();
            normalize_max_in_place(&mut chroma);
            chroma
        })
        .collect())
}
