//! Tuning estimation
//!
//! Estimates how far a recording's reference pitch sits from A440, in
//! fractions of a semitone, so the chroma filterbank can be centred on the
//! recording's actual semitone grid.
//!
//! # Algorithm
//!
//! 1. Per frame, pick bins between 150 Hz and 4 kHz that are local maxima and
//!    exceed 10 % of the frame's maximum magnitude
//! 2. Refine each peak's frequency by parabolic interpolation
//! 3. Keep peaks whose (interpolated) magnitude reaches the median of all peaks
//! 4. Histogram each peak's deviation from equal temperament at 0.01
//!    semitone resolution and return the most populated bin

use crate::spectral::stft::Spectrogram;

const MIN_FREQ_HZ: f32 = 150.0;
const MAX_FREQ_HZ: f32 = 4000.0;
const PEAK_THRESHOLD: f32 = 0.1;
const RESOLUTION: f32 = 0.01;

/// Spectral peak with interpolated frequency and magnitude
#[derive(Debug, Clone, Copy)]
struct Peak {
    freq: f32,
    magnitude: f32,
}

fn frame_peaks(frame: &[f32], spectrogram: &Spectrogram, peaks: &mut Vec<Peak>) {
    if frame.len() < 3 {
        return;
    }

    let frame_max = frame.iter().copied().fold(0.0f32, f32::max);
    if frame_max <= 0.0 {
        return;
    }
    let threshold = PEAK_THRESHOLD * frame_max;

    for k in 1..frame.len() - 1 {
        let freq = spectrogram.bin_frequency(k);
        if !(MIN_FREQ_HZ..MAX_FREQ_HZ).contains(&freq) {
            continue;
        }

        let (prev, curr, next) = (frame[k - 1], frame[k], frame[k + 1]);
        if curr <= threshold || curr <= prev || curr < next {
            continue;
        }

        let avg = 0.5 * (next - prev);
        let curvature = 2.0 * curr - next - prev;
        let shift = if curvature.abs() < f32::MIN_POSITIVE {
            0.0
        } else {
            avg / curvature
        };

        peaks.push(Peak {
            freq: (k as f32 + shift) * spectrogram.sample_rate() as f32
                / spectrogram.frame_size() as f32,
            magnitude: curr + 0.5 * avg * shift,
        });
    }
}

/// Estimate the tuning deviation of a spectrogram
///
/// # Returns
///
/// Deviation from A440 equal temperament in `[-0.5, 0.5)` semitones; `0.0`
/// when no usable spectral peaks exist (silence, noise-free DC, empty input)
pub fn estimate_tuning(spectrogram: &Spectrogram) -> f32 {
    let mut peaks = Vec::new();
    for frame in spectrogram.frames() {
        frame_peaks(frame, spectrogram, &mut peaks);
    }

    if peaks.is_empty() {
        log::debug!("No spectral peaks for tuning estimation, assuming A440");
        return 0.0;
    }

    let mut magnitudes: Vec<f32> = peaks.iter().map(|p| p.magnitude).collect();
    magnitudes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = magnitudes.len() / 2;
    let median = if magnitudes.len() % 2 == 0 {
        0.5 * (magnitudes[mid - 1] + magnitudes[mid])
    } else {
        magnitudes[mid]
    };

    let n_bins = (1.0 / RESOLUTION).ceil() as usize;
    let mut histogram = vec![0usize; n_bins];
    for peak in peaks.iter().filter(|p| p.magnitude >= median && p.freq > 0.0) {
        let mut residual = (12.0 * (peak.freq / 440.0).log2()).rem_euclid(1.0);
        if residual >= 0.5 {
            residual -= 1.0;
        }
        let idx = (((residual + 0.5) / RESOLUTION).floor() as usize).min(n_bins - 1);
        histogram[idx] += 1;
    }

    // First (lowest) bin wins ties
    let mut best = 0;
    for (i, &count) in histogram.iter().enumerate() {
        if count > histogram[best] {
            best = i;
        }
    }

    let tuning = -0.5 + best as f32 * RESOLUTION;
    log::debug!("Estimated tuning: {:+.2} semitones from {} peaks", tuning, peaks.len());
    tuning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::stft::compute_stft;

    fn tone(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (seconds * sample_rate as f32) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_in_tune_a440() {
        let spec = compute_stft(&tone(440.0, 22050, 1.0), 22050, 2048, 512).unwrap();
        let tuning = estimate_tuning(&spec);
        assert!(tuning.abs() <= 0.15, "tuning {}", tuning);
    }

    #[test]
    fn test_sharp_tone() {
        // A quarter-tone sharp of A4
        let freq = 440.0 * 2f32.powf(0.3 / 12.0);
        let spec = compute_stft(&tone(freq, 22050, 1.0), 22050, 2048, 512).unwrap();
        let tuning = estimate_tuning(&spec);
        assert!(tuning > 0.1 && tuning < 0.5, "tuning {}", tuning);
    }

    #[test]
    fn test_silence_defaults_to_zero() {
        let spec = compute_stft(&vec![0.0f32; 22050], 22050, 2048, 512).unwrap();
        assert_eq!(estimate_tuning(&spec), 0.0);
    }
}
