//! Spectral centroid
//!
//! Energy-weighted mean frequency of each magnitude frame, a correlate of
//! perceived brightness.

use crate::spectral::stft::Spectrogram;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Compute the spectral centroid of every frame
///
/// `centroid = Σ f_k·|X_k| / Σ |X_k|`, with `f_k = k·sr / frame_size`. A frame
/// whose magnitudes sum to (numerically) zero has centroid `0.0`.
///
/// # Returns
///
/// One centroid in Hz per frame
pub fn spectral_centroid(spectrogram: &Spectrogram) -> Vec<f32> {
    let freqs: Vec<f32> = (0..spectrogram.n_bins())
        .map(|k| spectrogram.bin_frequency(k))
        .collect();

    spectrogram
        .frames()
        .iter()
        .map(|frame| {
            let (weighted, total) = frame
                .iter()
                .zip(&freqs)
                .fold((0.0f64, 0.0f64), |(w, t), (&m, &f)| {
                    (w + (f * m) as f64, t + m as f64)
                });
            if total > EPSILON as f64 {
                (weighted / total) as f32
            } else {
                0.0
            }
        })
        .collect()
}
