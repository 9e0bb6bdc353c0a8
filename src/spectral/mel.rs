//! Mel filterbank and log-mel spectrogram
//!
//! Uses the Slaney mel scale: linear below 1 kHz (200/3 Hz per mel) and
//! logarithmic above, with triangular filters normalised to equal area.
//!
//! # Reference
//!
//! Slaney, M. (1998). Auditory Toolbox, Version 2. *Interval Research
//! Corporation Technical Report* #1998-010.

use super::stft::Spectrogram;
use crate::error::FeatureError;

/// Floor applied to power values before taking the logarithm
const AMIN: f32 = 1e-10;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert frequency in Hz to Slaney mels
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert Slaney mels to frequency in Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        mel * F_SP
    }
}

/// Build a mel filterbank
///
/// # Arguments
///
/// * `sample_rate` - Sample rate in Hz
/// * `n_fft` - FFT size the filterbank will be applied to
/// * `n_mels` - Number of mel bands
///
/// # Returns
///
/// `n_mels` filters, each `n_fft / 2 + 1` weights long, spanning 0 Hz to Nyquist
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` for a zero sample rate, FFT size or band count
pub fn mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
) -> Result<Vec<Vec<f32>>, FeatureError> {
    if sample_rate == 0 || n_fft == 0 || n_mels == 0 {
        return Err(FeatureError::InvalidInput(format!(
            "Invalid mel filterbank parameters: sr={}, n_fft={}, n_mels={}",
            sample_rate, n_fft, n_mels
        )));
    }

    let n_bins = n_fft / 2 + 1;
    let nyquist = sample_rate as f64 / 2.0;

    let fft_freqs: Vec<f64> = (0..n_bins)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    // n_mels + 2 edges, evenly spaced on the mel axis
    let mel_max = hz_to_mel(nyquist);
    let edges: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();

    let mut filters = Vec::with_capacity(n_mels);
    for m in 0..n_mels {
        let (lo, centre, hi) = (edges[m], edges[m + 1], edges[m + 2]);
        let lower_width = centre - lo;
        let upper_width = hi - centre;
        let enorm = 2.0 / (hi - lo);

        let filter: Vec<f32> = fft_freqs
            .iter()
            .map(|&f| {
                let rising = (f - lo) / lower_width;
                let falling = (hi - f) / upper_width;
                (rising.min(falling).max(0.0) * enorm) as f32
            })
            .collect();
        filters.push(filter);
    }

    Ok(filters)
}

/// Project a magnitude spectrogram onto a mel filterbank and convert to dB
///
/// The power spectrogram (|X|²) is projected onto `filterbank`, converted
/// with `10 * log10(max(AMIN, S))`, and every value more than `top_db` below
/// the global maximum is raised to that floor.
///
/// # Returns
///
/// Log-mel frames (n_frames × n_mels); empty if the spectrogram has no frames
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` if the filter width does not match
/// the spectrogram's bin count
pub fn log_mel_spectrogram(
    spectrogram: &Spectrogram,
    filterbank: &[Vec<f32>],
    top_db: f32,
) -> Result<Vec<Vec<f32>>, FeatureError> {
    let n_bins = spectrogram.n_bins();
    if let Some(bad) = filterbank.iter().find(|f| f.len() != n_bins) {
        return Err(FeatureError::InvalidInput(format!(
            "Filter width {} does not match spectrogram bins {}",
            bad.len(),
            n_bins
        )));
    }

    let mut log_mel: Vec<Vec<f32>> = spectrogram
        .frames()
        .iter()
        .map(|frame| {
            filterbank
                .iter()
                .map(|filter| {
                    let power: f32 = filter
                        .iter()
                        .zip(frame)
                        .map(|(&w, &m)| w * m * m)
                        .sum();
                    10.0 * power.max(AMIN).log10()
                })
                .collect()
        })
        .collect();

    let peak = log_mel
        .iter()
        .flatten()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    if peak.is_finite() {
        let floor = peak - top_db;
        for v in log_mel.iter_mut().flatten() {
            *v = v.max(floor);
        }
    }

    log::debug!(
        "Log-mel spectrogram: {} frames x {} bands, peak={:.2} dB",
        log_mel.len(),
        filterbank.len(),
        peak
    );

    Ok(log_mel)
}
