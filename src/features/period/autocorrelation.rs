//! Autocorrelation-based tempo estimation
//!
//! Finds the dominant periodicity of an onset strength envelope.
//!
//! # Algorithm
//!
//! 1. Compute autocorrelation using FFT acceleration: `ACF = IFFT(|FFT(env)|²)`
//! 2. Restrict lags to the configured BPM range:
//!    `BPM = (60 * sample_rate) / (lag * hop_size)`
//! 3. Score every lag by `ln(ACF[lag])` plus a log-normal prior centred on the
//!    prior tempo with a one-octave standard deviation
//! 4. Report the best-scoring lag unless its autocorrelation is below
//!    `MIN_PERIODICITY` of lag zero
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.
//!
//! # Example
//!
//! ```
//! use stratum_features::features::period::autocorrelation::estimate_tempo;
//!
//! // One onset every 22 frames
//! let mut envelope = vec![0.0f32; 600];
//! for i in (0..600).step_by(22) {
//!     envelope[i] = 1.0;
//! }
//! let tempo = estimate_tempo(&envelope, 22050, 512, 30.0, 320.0, 120.0)?;
//! assert!(tempo.is_some());
//! # Ok::<(), stratum_features::FeatureError>(())
//! ```

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::TempoEstimate;
use crate::error::FeatureError;

const EPSILON: f32 = 1e-10;

/// Minimum ACF at the chosen lag, relative to lag zero, for a reliable tempo
pub const MIN_PERIODICITY: f32 = 0.1;

/// Standard deviation of the tempo prior, in octaves
const PRIOR_STD_OCTAVES: f32 = 1.0;

/// Estimate the dominant tempo of an onset strength envelope
///
/// # Arguments
///
/// * `envelope` - Onset strength, one value per STFT frame
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop size of the STFT that produced the envelope
/// * `min_bpm` - Slowest tempo considered
/// * `max_bpm` - Fastest tempo considered
/// * `prior_bpm` - Centre of the log-normal tempo prior
///
/// # Returns
///
/// `Some(TempoEstimate)` for a reliable periodicity, `None` when the envelope
/// carries no energy, is too short to hold the slowest considered period's
/// fastest counterpart, or has no lag above `MIN_PERIODICITY`
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` for a zero sample rate or hop size or
/// an invalid BPM range
pub fn estimate_tempo(
    envelope: &[f32],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
    prior_bpm: f32,
) -> Result<Option<TempoEstimate>, FeatureError> {
    log::debug!(
        "Estimating tempo from autocorrelation: {} frames, {} Hz, hop={}, range=[{:.1}, {:.1}] BPM",
        envelope.len(),
        sample_rate,
        hop_size,
        min_bpm,
        max_bpm
    );

    if sample_rate == 0 {
        return Err(FeatureError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(FeatureError::InvalidInput(
            "Invalid hop size: 0".to_string(),
        ));
    }

    if min_bpm <= 0.0 || max_bpm <= 0.0 || min_bpm >= max_bpm || prior_bpm <= 0.0 {
        return Err(FeatureError::InvalidInput(format!(
            "Invalid BPM range: [{:.1}, {:.1}] (prior {:.1})",
            min_bpm, max_bpm, prior_bpm
        )));
    }

    if envelope.len() < 2 {
        log::debug!("Envelope too short for autocorrelation: {}", envelope.len());
        return Ok(None);
    }

    let acf = compute_autocorrelation_fft(envelope);
    let energy = acf[0];
    if energy <= EPSILON {
        log::debug!("Onset envelope has no energy, tempo undefined");
        return Ok(None);
    }

    // BPM = (60 * sample_rate) / (lag * hop_size)
    let frames_per_minute = 60.0 * sample_rate as f32 / hop_size as f32;
    let lag_min = ((frames_per_minute / max_bpm).ceil() as usize).max(1);
    let lag_max = ((frames_per_minute / min_bpm).floor() as usize).min(acf.len() - 1);

    if lag_min > lag_max {
        log::debug!(
            "Lag range [{}, {}] empty for envelope of {} frames",
            lag_min,
            lag_max,
            envelope.len()
        );
        return Ok(None);
    }

    let log_prior_centre = prior_bpm.log2();
    let mut best: Option<(usize, f32)> = None;
    for lag in lag_min..=lag_max {
        let value = acf[lag];
        if value <= EPSILON * energy {
            continue;
        }
        let bpm = frames_per_minute / lag as f32;
        let z = (bpm.log2() - log_prior_centre) / PRIOR_STD_OCTAVES;
        let score = value.ln() - 0.5 * z * z;
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((lag, score));
        }
    }

    let Some((lag, _)) = best else {
        log::debug!("No positive autocorrelation in lag range");
        return Ok(None);
    };

    let periodicity = (acf[lag] / energy).min(1.0);
    if periodicity < MIN_PERIODICITY {
        log::debug!(
            "Best lag {} has periodicity {:.3} < {:.3}, tempo unreliable",
            lag,
            periodicity,
            MIN_PERIODICITY
        );
        return Ok(None);
    }

    let bpm = frames_per_minute / lag as f32;
    log::debug!(
        "Tempo estimate: {:.2} BPM (lag={}, periodicity={:.3})",
        bpm,
        lag,
        periodicity
    );

    Ok(Some(TempoEstimate {
        bpm,
        periodicity,
        lag,
    }))
}

/// Compute autocorrelation using FFT acceleration
///
/// Uses the identity: ACF = IFFT(|FFT(signal)|²)
///
/// # Arguments
///
/// * `signal` - Input signal (onset strength envelope)
///
/// # Returns
///
/// Autocorrelation function (same length as input)
fn compute_autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();

    // FFT size: next power of 2 >= 2*n (for zero-padding)
    let fft_size = (2 * n).next_power_of_two();

    let mut fft_input: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft_input.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut fft_input);

    for x in &mut fft_input {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut fft_input);

    // Extract real part and normalize by FFT size
    let scale = 1.0 / (fft_size as f32);
    fft_input[..n]
        .iter()
        .map(|x| (x.re * scale).max(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse_train(len: usize, period: usize) -> Vec<f32> {
        let mut env = vec![0.0f32; len];
        for i in (0..len).step_by(period) {
            env[i] = 1.0;
        }
        env
    }

    #[test]
    fn test_pulse_train_tempo() {
        // 22 frames at 22050 Hz / 512 hop = 117.45 BPM
        let env = pulse_train(800, 22);
        let tempo = estimate_tempo(&env, 22050, 512, 30.0, 320.0, 120.0)
            .unwrap()
            .unwrap();
        let expected = 60.0 * 22050.0 / (512.0 * 22.0);
        assert_eq!(tempo.lag, 22);
        assert!((tempo.bpm - expected).abs() < 1e-3);
        assert!(tempo.periodicity > 0.5);
    }

    #[test]
    fn test_prior_prefers_beat_over_half_tempo() {
        // Peaks at lag 22 and 44 both exist; the prior keeps the one near 120 BPM
        let env = pulse_train(800, 22);
        let tempo = estimate_tempo(&env, 22050, 512, 30.0, 320.0, 120.0)
            .unwrap()
            .unwrap();
        assert!(tempo.bpm > 90.0 && tempo.bpm < 160.0);
    }

    #[test]
    fn test_zero_envelope_is_unknown() {
        let env = vec![0.0f32; 500];
        assert_eq!(estimate_tempo(&env, 22050, 512, 30.0, 320.0, 120.0).unwrap(), None);
    }

    #[test]
    fn test_single_impulse_is_unknown() {
        let mut env = vec![0.0f32; 500];
        env[3] = 5.0;
        assert_eq!(estimate_tempo(&env, 22050, 512, 30.0, 320.0, 120.0).unwrap(), None);
    }

    #[test]
    fn test_too_short_is_unknown() {
        // Fastest lag (320 BPM) is 9 frames; 5 frames cannot hold it
        let env = vec![1.0f32, 0.0, 1.0, 0.0, 1.0];
        assert_eq!(estimate_tempo(&env, 22050, 512, 30.0, 320.0, 120.0).unwrap(), None);
    }

    #[test]
    fn test_invalid_params() {
        let env = pulse_train(100, 10);
        assert!(estimate_tempo(&env, 0, 512, 30.0, 320.0, 120.0).is_err());
        assert!(estimate_tempo(&env, 22050, 0, 30.0, 320.0, 120.0).is_err());
        assert!(estimate_tempo(&env, 22050, 512, 320.0, 30.0, 120.0).is_err());
        assert!(estimate_tempo(&env, 22050, 512, 30.0, 320.0, 0.0).is_err());
    }

    #[test]
    fn test_compute_autocorrelation_fft() {
        let signal = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let acf = compute_autocorrelation_fft(&signal);

        assert_eq!(acf.len(), signal.len());
        assert!((acf[0] - 3.0).abs() < 1e-4);
        assert!((acf[2] - 2.0).abs() < 1e-4);
        assert!(acf[1].abs() < 1e-4);
    }
}
