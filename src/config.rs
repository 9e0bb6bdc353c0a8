//! Pipeline constants and extraction parameters
//!
//! Window, hop and coefficient counts are fixed so that tables produced by
//! different runs stay comparable column-for-column. `ExtractionConfig` exists
//! for library callers; its `Default` is exactly these constants and the
//! command-line tool never changes it.

/// Number of MFCC coefficients kept per frame
pub const NUM_MFCC: usize = 13;

/// Number of chroma (pitch-class) bins
pub const NUM_CHROMA: usize = 12;

/// STFT frame size in samples
pub const FRAME_SIZE: usize = 2048;

/// STFT hop size in samples
pub const HOP_SIZE: usize = 512;

/// Number of mel bands used for MFCC and onset strength
pub const N_MELS: usize = 128;

/// Dynamic range kept by the log-mel conversion, in dB below the peak
pub const TOP_DB: f32 = 80.0;

/// Slowest tempo considered, in BPM
pub const MIN_TEMPO_BPM: f32 = 30.0;

/// Fastest tempo considered, in BPM
pub const MAX_TEMPO_BPM: f32 = 320.0;

/// Centre of the log-normal tempo prior, in BPM
pub const PRIOR_TEMPO_BPM: f32 = 120.0;

/// Decimal places for MFCC and chroma means
pub const FEATURE_DECIMALS: u32 = 5;

/// Decimal places for duration, centroid and tempo
pub const SCALAR_DECIMALS: u32 = 3;

/// File extensions (lower-case) picked up when scanning a directory
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "wave", "flac", "mp3", "ogg", "oga", "m4a", "aac", "aif", "aiff", "caf",
];

/// Feature extraction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Frame size for STFT (default: 2048)
    pub frame_size: usize,

    /// Hop size for STFT (default: 512)
    pub hop_size: usize,

    /// Mel bands (default: 128)
    pub n_mels: usize,

    // Tempo
    /// Minimum BPM to consider (default: 30.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 320.0)
    pub max_bpm: f32,

    /// Centre of the tempo prior (default: 120.0)
    pub prior_bpm: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            frame_size: FRAME_SIZE,
            hop_size: HOP_SIZE,
            n_mels: N_MELS,
            min_bpm: MIN_TEMPO_BPM,
            max_bpm: MAX_TEMPO_BPM,
            prior_bpm: PRIOR_TEMPO_BPM,
        }
    }
}

/// Check whether a file extension is a recognised audio extension
///
/// Comparison is case-insensitive.
pub fn is_audio_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    AUDIO_EXTENSIONS.contains(&lower.as_str())
}
