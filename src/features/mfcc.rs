//! MFCC extraction
//!
//! Log-mel frames → orthonormal DCT-II → leading `n_mfcc` coefficients.
//!
//! # Example
//!
//! ```
//! use stratum_features::features::mfcc::extract_mfcc;
//!
//! let log_mel = vec![vec![-20.0f32; 128]; 10];
//! let mfcc = extract_mfcc(&log_mel, 13)?;
//! assert_eq!(mfcc.len(), 10);
//! assert!(mfcc.iter().all(|frame| frame.len() == 13));
//! # Ok::<(), stratum_features::FeatureError>(())
//! ```

use std::f64::consts::PI;

use crate::error::FeatureError;

/// Orthonormal DCT-II basis (`n_out` rows × `n_in` columns)
fn dct_basis(n_in: usize, n_out: usize) -> Vec<Vec<f32>> {
    let n = n_in as f64;
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_in)
                .map(|i| (scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos()) as f32)
                .collect()
        })
        .collect()
}

/// Compute MFCCs from a log-mel spectrogram
///
/// # Arguments
///
/// * `log_mel` - Log-mel frames in dB (n_frames × n_mels)
/// * `n_mfcc` - Coefficients to keep per frame
///
/// # Returns
///
/// MFCC frames (n_frames × n_mfcc); empty when `log_mel` is empty
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` if `n_mfcc` is zero or larger than
/// the number of mel bands, or if frames have inconsistent widths
pub fn extract_mfcc(log_mel: &[Vec<f32>], n_mfcc: usize) -> Result<Vec<Vec<f32>>, FeatureError> {
    if log_mel.is_empty() {
        return Ok(Vec::new());
    }

    let n_mels = log_mel[0].len();
    if n_mfcc == 0 || n_mfcc > n_mels {
        return Err(FeatureError::InvalidInput(format!(
            "Cannot keep {} MFCCs from {} mel bands",
            n_mfcc, n_mels
        )));
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

    log::debug!(
        "Computing MFCC: {} frames, {} bands -> {} coefficients",
        log_mel.len(),
        n_mels,
        n_mfcc
    );

    let basis = dct_basis(n_mels, n_mfcc);
    Ok(log_mel
        .iter()
        .map(|frame| {
            basis
                .iter()
                .map(|row| row.iter().zip(frame).map(|(&b, &x)| b * x).sum())
                .collect()
        })
        .collect())
}
