//! Spectral engine
//!
//! Short-time spectral representations shared by every extractor:
//! - Tapering windows
//! - Centered STFT magnitude spectrogram
//! - Mel filterbank and log-mel conversion

pub mod mel;
pub mod stft;
pub mod window;
