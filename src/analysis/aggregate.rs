//! Time aggregation of per-frame features
//!
//! Runs every extractor on one waveform and collapses the frame-level
//! matrices into fixed-width mean vectors. Degenerate input and extractor
//! misbehaviour never abort a file: they become [`FeatureWarning`]s and the
//! affected fields are left missing.

use crate::config::{ExtractionConfig, NUM_CHROMA, NUM_MFCC, TOP_DB};
use crate::error::FeatureError;
use crate::features::centroid::spectral_centroid;
use crate::features::chroma::extractor::extract_chroma;
use crate::features::check_frame_width;
use crate::features::mfcc::extract_mfcc;
use crate::features::onset::onset_strength;
use crate::features::period::autocorrelation::estimate_tempo;
use crate::io::waveform::Waveform;
use crate::spectral::mel::{log_mel_spectrogram, mel_filterbank};
use crate::spectral::stft::compute_stft;

/// Non-fatal condition noticed while summarizing a file
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureWarning {
    /// Input carried too little signal for a feature to be defined
    DegenerateInput {
        /// Affected feature ("waveform" for the input as a whole)
        feature: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// An extractor returned frames of the wrong width
    ShapeMismatch {
        /// Affected feature
        feature: &'static str,
        /// Expected coefficients per frame
        expected: usize,
        /// Coefficients actually found
        found: usize,
    },
}

impl std::fmt::Display for FeatureWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureWarning::DegenerateInput { feature, reason } => {
                write!(f, "{}: {}", feature, reason)
            }
            FeatureWarning::ShapeMismatch {
                feature,
                expected,
                found,
            } => write!(
                f,
                "{}: expected {} coefficients per frame, found {}",
                feature, expected, found
            ),
        }
    }
}

/// Time-averaged features of one waveform (unrounded)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSummary {
    /// Mean MFCC vector
    pub mfcc_mean: Option<[f64; NUM_MFCC]>,

    /// Mean chroma vector (index 0 = C)
    pub chroma_mean: Option<[f64; NUM_CHROMA]>,

    /// Mean spectral centroid in Hz
    pub spectral_centroid_mean: Option<f64>,

    /// Dominant tempo in BPM
    pub tempo: Option<f64>,

    /// Conditions noticed while summarizing
    pub warnings: Vec<FeatureWarning>,
}

/// Arithmetic mean of each coefficient over all frames
///
/// Accumulates in `f64`. Frames are expected to be `width` long (see
/// [`check_frame_width`]); extra coefficients are ignored.
///
/// # Returns
///
/// `None` if there are no frames
pub fn mean_over_time(frames: &[Vec<f32>], width: usize) -> Option<Vec<f64>> {
    if frames.is_empty() {
        return None;
    }

    let mut sums = vec![0.0f64; width];
    for frame in frames {
        for (sum, &v) in sums.iter_mut().zip(frame) {
            *sum += v as f64;
        }
    }

    let n = frames.len() as f64;
    Some(sums.into_iter().map(|s| s / n).collect())
}

/// Round half away from zero to `decimals` places
///
/// Negative zero is normalised to `0.0`; non-finite values pass through.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Validate a feature matrix and collapse it to a fixed-width mean
fn summarize_matrix<const N: usize>(
    feature: &'static str,
    frames: &[Vec<f32>],
) -> Result<Option<[f64; N]>, FeatureError> {
    check_frame_width(feature, frames, N)?;

    match mean_over_time(frames, N) {
        Some(mean) if mean.iter().any(|v| !v.is_finite()) => Err(FeatureError::InvalidInput(
            format!("non-finite {} mean", feature),
        )),
        Some(mean) => {
            let mut out = [0.0f64; N];
            out.copy_from_slice(&mean);
            Ok(Some(out))
        }
        None => Ok(None),
    }
}

/// Keep a scalar summary only if it is finite
fn finite_scalar(
    warnings: &mut Vec<FeatureWarning>,
    feature: &'static str,
    value: Option<f64>,
) -> Option<f64> {
    match value {
        Some(v) if !v.is_finite() => {
            note_failure(
                warnings,
                feature,
                FeatureError::InvalidInput(format!("non-finite {} mean", feature)),
            );
            None
        }
        other => other,
    }
}

/// Turn an extractor failure into a warning
fn note_failure(warnings: &mut Vec<FeatureWarning>, feature: &'static str, err: FeatureError) {
    match err {
        FeatureError::ShapeMismatch {
            feature,
            expected,
            found,
        } => {
            log::warn!(
                "{} extractor returned {} coefficients per frame (expected {}), leaving it missing",
                feature,
                found,
                expected
            );
            warnings.push(FeatureWarning::ShapeMismatch {
                feature,
                expected,
                found,
            });
        }
        other => {
            log::warn!("{} unavailable: {}", feature, other);
            warnings.push(FeatureWarning::DegenerateInput {
                feature,
                reason: other.to_string(),
            });
        }
    }
}

/// Summarize a waveform with the default extraction parameters
pub fn summarize(waveform: &Waveform) -> FeatureSummary {
    summarize_with_config(waveform, &ExtractionConfig::default())
}

/// Summarize a waveform
///
/// Computes one STFT shared by every extractor, then MFCC, spectral
/// centroid, chroma and tempo, each averaged over time.
///
/// Never fails: empty, silent or non-finite waveforms, extractor errors,
/// non-finite means and shape mismatches are reported in [`FeatureSummary::warnings`] and leave the
/// corresponding fields `None`.
pub fn summarize_with_config(waveform: &Waveform, config: &ExtractionConfig) -> FeatureSummary {
    let mut summary = FeatureSummary::default();
    let sample_rate = waveform.sample_rate();

    if waveform.is_empty() {
        summary.warnings.push(FeatureWarning::DegenerateInput {
            feature: "waveform",
            reason: "no samples".to_string(),
        });
    } else if !waveform.is_finite() {
        // NaN or infinite samples contaminate every frame they touch
        log::warn!("Waveform contains non-finite samples, leaving all features missing");
        summary.warnings.push(FeatureWarning::DegenerateInput {
            feature: "waveform",
            reason: "non-finite samples".to_string(),
        });
        return summary;
    } else if waveform.is_silent() {
        summary.warnings.push(FeatureWarning::DegenerateInput {
            feature: "waveform",
            reason: "silent".to_string(),
        });
    }

    let spectrogram = match compute_stft(
        waveform.samples(),
        sample_rate,
        config.frame_size,
        config.hop_size,
    ) {
        Ok(s) => s,
        Err(e) => {
            note_failure(&mut summary.warnings, "spectrogram", e);
            return summary;
        }
    };

    // Brightness
    let centroids: Vec<Vec<f32>> = spectral_centroid(&spectrogram)
        .into_iter()
        .map(|c| vec![c])
        .collect();
    summary.spectral_centroid_mean = finite_scalar(
        &mut summary.warnings,
        "spectral_centroid",
        mean_over_time(&centroids, 1).map(|m| m[0]),
    );

    // Timbre and tempo share the log-mel spectrogram
    let log_mel = mel_filterbank(sample_rate, config.frame_size, config.n_mels)
        .and_then(|filterbank| log_mel_spectrogram(&spectrogram, &filterbank, TOP_DB));

    match log_mel {
        Ok(log_mel) => {
            match extract_mfcc(&log_mel, NUM_MFCC)
                .and_then(|mfcc| summarize_matrix::<NUM_MFCC>("mfcc", &mfcc))
            {
                Ok(mean) => summary.mfcc_mean = mean,
                Err(e) => note_failure(&mut summary.warnings, "mfcc", e),
            }

            let tempo = onset_strength(&log_mel).and_then(|envelope| {
                estimate_tempo(
                    &envelope,
                    sample_rate,
                    config.hop_size,
                    config.min_bpm,
                    config.max_bpm,
                    config.prior_bpm,
                )
            });
            match tempo {
                Ok(Some(estimate)) => {
                    summary.tempo =
                        finite_scalar(&mut summary.warnings, "tempo", Some(estimate.bpm as f64))
                }
                Ok(None) => summary.warnings.push(FeatureWarning::DegenerateInput {
                    feature: "tempo",
                    reason: "no reliable periodicity".to_string(),
                }),
                Err(e) => note_failure(&mut summary.warnings, "tempo", e),
            }
        }
        Err(e) => {
            note_failure(&mut summary.warnings, "mfcc", e.clone());
            note_failure(&mut summary.warnings, "tempo", e);
        }
    }

    // Harmony
    match extract_chroma(&spectrogram, NUM_CHROMA)
        .and_then(|chroma| summarize_matrix::<NUM_CHROMA>("chroma", &chroma))
    {
        Ok(mean) => summary.chroma_mean = mean,
        Err(e) => note_failure(&mut summary.warnings, "chroma", e),
    }

    if spectrogram.n_frames() == 0 {
        summary.warnings.push(FeatureWarning::DegenerateInput {
            feature: "spectrogram",
            reason: "zero frames".to_string(),
        });
    }

    log::debug!(
        "Summarized {:.3}s: centroid={:?}, tempo={:?}, {} warnings",
        waveform.duration_seconds(),
        summary.spectral_centroid_mean,
        summary.tempo,
        summary.warnings.len()
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Waveform {
        let n = (sample_rate as f32 * seconds) as usize;
        let samples = (0..n)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        Waveform::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_mean_over_time() {
        let frames = vec![vec![1.0f32, 2.0], vec![3.0, 6.0]];
        assert_eq!(mean_over_time(&frames, 2), Some(vec![2.0, 4.0]));
        assert_eq!(mean_over_time(&[], 2), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789, 5), 1.23457);
        assert_eq!(round_to(2.0005, 3), 2.001);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(123.4564, 3), 123.456);
    }

    #[test]
    fn test_round_to_normalises_negative_zero() {
        let r = round_to(-0.000001, 3);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_summarize_matrix_shape_mismatch() {
        let frames = vec![vec![0.5f32; 11]; 10];
        let result = summarize_matrix::<NUM_CHROMA>("chroma", &frames);
        assert_eq!(
            result,
            Err(FeatureError::ShapeMismatch {
                feature: "chroma",
                expected: 12,
                found: 11
            })
        );
    }

    #[test]
    fn test_shape_mismatch_becomes_warning() {
        let mut warnings = Vec::new();
        note_failure(
            &mut warnings,
            "chroma",
            FeatureError::ShapeMismatch {
                feature: "chroma",
                expected: 12,
                found: 11,
            },
        );
        assert_eq!(
            warnings,
            vec![FeatureWarning::ShapeMismatch {
                feature: "chroma",
                expected: 12,
                found: 11
            }]
        );
    }

    #[test]
    fn test_summarize_sine() {
        let waveform = sine(441.0, 44100, 2.0);
        let summary = summarize(&waveform);

        let centroid = summary.spectral_centroid_mean.unwrap();
        assert!((centroid - 441.0).abs() < 441.0 * 0.05, "centroid {}", centroid);

        let chroma = summary.chroma_mean.unwrap();
        let argmax = chroma
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(argmax, 9);

        assert!(summary.mfcc_mean.is_some());
    }

    #[test]
    fn test_summarize_silence() {
        let waveform = Waveform::new(vec![0.0; 44100], 44100).unwrap();
        let summary = summarize(&waveform);

        assert_eq!(summary.spectral_centroid_mean, Some(0.0));
        assert!(summary.mfcc_mean.is_some());
        assert_eq!(summary.chroma_mean, Some([0.0; NUM_CHROMA]));
        assert_eq!(summary.tempo, None);
        assert!(summary
            .warnings
            .iter()
            .any(|w| matches!(w, FeatureWarning::DegenerateInput { feature: "tempo", .. })));
    }

    #[test]
    fn test_summarize_empty() {
        let waveform = Waveform::new(Vec::new(), 22050).unwrap();
        let summary = summarize(&waveform);

        assert_eq!(summary.mfcc_mean, None);
        assert_eq!(summary.chroma_mean, None);
        assert_eq!(summary.spectral_centroid_mean, None);
        assert_eq!(summary.tempo, None);
        assert!(!summary.warnings.is_empty());
    }

    #[test]
    fn test_non_finite_mean_is_rejected() {
        let frames = vec![vec![f32::NAN; NUM_CHROMA], vec![0.5; NUM_CHROMA]];
        let result = summarize_matrix::<NUM_CHROMA>("chroma", &frames);
        assert!(matches!(result, Err(FeatureError::InvalidInput(_))));

        let mut warnings = Vec::new();
        assert_eq!(finite_scalar(&mut warnings, "tempo", Some(f64::INFINITY)), None);
        assert_eq!(finite_scalar(&mut warnings, "tempo", Some(120.0)), Some(120.0));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_summarize_nan_sample_leaves_features_missing() {
        let mut waveform_samples: Vec<f32> = sine(441.0, 22050, 1.0).samples().to_vec();
        waveform_samples[500] = f32::NAN;
        let waveform = Waveform::new(waveform_samples, 22050).unwrap();
        let summary = summarize(&waveform);

        assert_eq!(summary.mfcc_mean, None);
        assert_eq!(summary.chroma_mean, None);
        assert_eq!(summary.spectral_centroid_mean, None);
        assert_eq!(summary.tempo, None);
        assert!(summary.warnings.iter().any(|w| matches!(
            w,
            FeatureWarning::DegenerateInput { feature: "waveform", .. }
        )));
    }

    #[test]
    fn test_summarize_odd_frame_size() {
        let config = ExtractionConfig {
            frame_size: 2047,
            ..ExtractionConfig::default()
        };
        let waveform = Waveform::new(sine(441.0, 22050, 0.05).samples().to_vec(), 22050).unwrap();
        let summary = summarize_with_config(&waveform, &config);
        assert!(summary.mfcc_mean.is_some());
        assert!(summary.chroma_mean.is_some());
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let waveform = sine(330.0, 22050, 1.0);
        assert_eq!(summarize(&waveform), summarize(&waveform));
    }
}
