//! Chroma filterbank
//!
//! Maps linear-frequency FFT bins onto 12 pitch classes. Each FFT bin
//! contributes a Gaussian bump over the (circular) semitone axis whose width
//! follows the bin spacing in semitones; columns are L2-normalised and then
//! weighted by a Gaussian over octaves so that very low and very high
//! partials contribute less.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Chroma feature analysis and synthesis.
//! <https://www.ee.columbia.edu/~dpwe/resources/matlab/chroma-ansyn/>

use crate::error::FeatureError;

/// Octave the weighting Gaussian is centred on (octave 0 starts at A0 = 27.5 Hz)
const CENTER_OCTAVE: f64 = 5.0;

/// Standard deviation of the octave weighting, in octaves
const OCTAVE_WIDTH: f64 = 2.0;

/// Build a chroma filterbank
///
/// # Arguments
///
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT size
/// * `n_chroma` - Number of chroma bins (12 for semitones)
/// * `tuning` - Tuning deviation from A440 in semitones
///
/// # Returns
///
/// `n_chroma` rows of `n_fft / 2 + 1` weights; row 0 is C
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` for zero sizes or a non-finite tuning
pub fn chroma_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_chroma: usize,
    tuning: f32,
) -> Result<Vec<Vec<f32>>, FeatureError> {
    if sample_rate == 0 || n_fft < 2 || n_chroma == 0 || !tuning.is_finite() {
        return Err(FeatureError::InvalidInput(format!(
            "Invalid chroma filterbank parameters: sr={}, n_fft={}, n_chroma={}, tuning={}",
            sample_rate, n_fft, n_chroma, tuning
        )));
    }

    let n_chroma_f = n_chroma as f64;
    let a440 = 440.0 * 2f64.powf(tuning as f64 / n_chroma_f);
    let a0 = a440 / 16.0;

    // Position of every full-spectrum FFT bin on the chroma axis; DC gets a
    // position 1.5 octaves below bin 1.
    let mut positions = Vec::with_capacity(n_fft);
    positions.push(0.0);
    for k in 1..n_fft {
        let freq = k as f64 * sample_rate as f64 / n_fft as f64;
        positions.push(n_chroma_f * (freq / a0).log2());
    }
    positions[0] = positions[1] - 1.5 * n_chroma_f;

    let widths: Vec<f64> = (0..n_fft)
        .map(|k| {
            if k + 1 < n_fft {
                (positions[k + 1] - positions[k]).max(1.0)
            } else {
                1.0
            }
        })
        .collect();

    let half = (n_chroma_f / 2.0).round();
    let mut weights = vec![vec![0.0f64; n_fft]; n_chroma];
    for (c, row) in weights.iter_mut().enumerate() {
        for k in 0..n_fft {
            let d = (positions[k] - c as f64 + half + 10.0 * n_chroma_f).rem_euclid(n_chroma_f) - half;
            row[k] = (-0.5 * (2.0 * d / widths[k]).powi(2)).exp();
        }
    }

    // L2-normalise each FFT bin's column, then apply the octave weighting
    for k in 0..n_fft {
        let norm = weights.iter().map(|row| row[k] * row[k]).sum::<f64>().sqrt();
        let octave = positions[k] / n_chroma_f;
        let octave_weight = (-0.5 * ((octave - CENTER_OCTAVE) / OCTAVE_WIDTH).powi(2)).exp();
        for row in weights.iter_mut() {
            if norm > 0.0 {
                row[k] /= norm;
            }
            row[k] *= octave_weight;
        }
    }

    // Rotate so that row 0 is C rather than A
    let shift = 3 * (n_chroma / 12);
    let n_bins = n_fft / 2 + 1;
    Ok((0..n_chroma)
        .map(|c| {
            weights[(c + shift) % n_chroma][..n_bins]
                .iter()
                .map(|&w| w as f32)
                .collect()
        })
        .collect())
}
