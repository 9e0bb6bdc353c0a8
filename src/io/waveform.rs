//! Mono waveform container

/// Decoded mono audio at its native sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Mono samples in the decoder's native range
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from mono samples
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::InvalidInput` if `sample_rate` is zero.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, crate::error::FeatureError> {
        if sample_rate == 0 {
            return Err(crate::error::FeatureError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Mono samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the waveform holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (`len / sample_rate`)
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True if every sample is (numerically) zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|s| s.abs() <= f32::EPSILON)
    }

    /// True if no sample is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }
}
