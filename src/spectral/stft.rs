//! Short-time Fourier transform
//!
//! Produces a magnitude spectrogram (n_frames × n_bins) from mono samples.
//!
//! # Algorithm
//!
//! 1. Zero-pad the signal by `frame_size / 2` on both sides so frame `t` is
//!    centred on sample `t * hop_size`
//! 2. Multiply each frame by a periodic Hann window
//! 3. FFT each frame and keep the magnitudes of bins `0..=frame_size / 2`
//!
//! The number of bins depends only on `frame_size`; the number of frames is
//! `1 + len / hop_size` for non-empty input and zero for empty input.
//!
//! # Example
//!
//! ```
//! use stratum_features::spectral::stft::compute_stft;
//!
//! let samples = vec![0.0f32; 22050];
//! let spec = compute_stft(&samples, 22050, 2048, 512)?;
//! assert_eq!(spec.n_bins(), 1025);
//! assert_eq!(spec.n_frames(), 1 + 22050 / 512);
//! # Ok::<(), stratum_features::FeatureError>(())
//! ```

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::window::hann_window;
use crate::error::FeatureError;

/// Magnitude spectrogram
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    frames: Vec<Vec<f32>>,
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
}

impl Spectrogram {
    /// Magnitude frames (n_frames × n_bins)
    pub fn frames(&self) -> &[Vec<f32>] {
        &self.frames
    }

    /// Number of time frames
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of frequency bins (`frame_size / 2 + 1`)
    pub fn n_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Sample rate of the analysed signal
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// FFT size used for each frame
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop between frames in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Centre frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate as f32 / self.frame_size as f32
    }

    /// Power spectrogram (squared magnitudes)
    pub fn power_frames(&self) -> Vec<Vec<f32>> {
        self.frames
            .iter()
            .map(|frame| frame.iter().map(|&m| m * m).collect())
            .collect()
    }
}

/// Compute a centred STFT magnitude spectrogram
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT size (typically 2048)
/// * `hop_size` - Hop between frames (typically 512)
///
/// # Returns
///
/// `Spectrogram` with `1 + len / hop_size` frames, or zero frames for empty input
///
/// # Errors
///
/// Returns `FeatureError::InvalidInput` if `frame_size`, `hop_size` or
/// `sample_rate` is zero
pub fn compute_stft(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, FeatureError> {
    if frame_size == 0 {
        return Err(FeatureError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(FeatureError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(FeatureError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if samples.is_empty() {
        log::debug!("STFT on empty input, returning zero frames");
        return Ok(Spectrogram {
            frames: Vec::new(),
            sample_rate,
            frame_size,
            hop_size,
        });
    }

    // Left pad centres frame t on sample t * hop; the right pad keeps the
    // last frame in bounds for odd frame sizes too
    let pad = frame_size / 2;
    let mut padded = vec![0.0f32; samples.len() + frame_size];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let n_frames = 1 + samples.len() / hop_size;
    let n_bins = frame_size / 2 + 1;

    log::debug!(
        "Computing STFT: {} samples, frame={}, hop={}, {} frames x {} bins",
        samples.len(),
        frame_size,
        hop_size,
        n_frames,
        n_bins
    );

    let window = hann_window(frame_size);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];
    let mut scratch = vec![Complex::new(0.0f32, 0.0); fft.get_inplace_scratch_len()];

    let mut frames = Vec::with_capacity(n_frames);
    for t in 0..n_frames {
        let start = t * hop_size;
        let frame = &padded[start..start + frame_size];

        for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&window) {
            *slot = Complex::new(x * w, 0.0);
        }

        fft.process_with_scratch(&mut buffer, &mut scratch);
        frames.push(buffer[..n_bins].iter().map(|c| c.norm()).collect());
    }

    Ok(Spectrogram {
        frames,
        sample_rate,
        frame_size,
        hop_size,
    })
}
