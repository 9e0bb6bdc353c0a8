//! Onset detection modules
//!
//! Onset strength envelope derived from the log-mel spectrogram, consumed by
//! periodicity (tempo) estimation.

pub mod spectral_flux;

pub use spectral_flux::onset_strength;
