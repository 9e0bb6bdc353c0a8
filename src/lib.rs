//! # Stratum Features
//!
//! Fixed-width audio feature extraction for tabular datasets: every audio
//! file becomes one row with the same columns, whatever its length.
//!
//! ## Features
//!
//! - **MFCC**: 13 time-averaged mel-frequency cepstral coefficients
//! - **Spectral centroid**: mean brightness in Hz
//! - **Chroma**: 12 time-averaged pitch-class energies, tuning-corrected
//! - **Tempo**: dominant beat rate from onset autocorrelation
//! - **Batch runner**: directory to CSV, one row per decodable file
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use stratum_features::analyze_file;
//!
//! let report = analyze_file(Path::new("track.wav"))?;
//! println!("Tempo: {:?}", report.record.tempo);
//! println!("Centroid: {:?} Hz", report.record.spectral_centroid_mean);
//! # Ok::<(), stratum_features::FeatureError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! File → Decoding → Waveform → STFT → MFCC / Centroid / Chroma / Tempo → Aggregation → Record → Sink
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod spectral;

use std::path::Path;

// Re-export main types
pub use analysis::aggregate::{summarize, summarize_with_config, FeatureSummary, FeatureWarning};
pub use analysis::record::{FileReport, Record};
pub use batch::progress::{LogProgress, NullProgress, ProgressSink};
pub use batch::runner::{run_batch, BatchRunner, BatchSummary};
pub use batch::sink::{CsvSink, RecordSink};
pub use config::ExtractionConfig;
pub use error::FeatureError;
pub use io::waveform::Waveform;

/// Analyze one audio file with the default parameters
///
/// Decodes the file to mono at its native sample rate, extracts every
/// feature and assembles the output row.
///
/// # Errors
///
/// Returns `FeatureError::Decode` if the file cannot be decoded. Feature
/// level problems (silence, too short for a tempo) are not errors; they are
/// reported in [`FileReport::warnings`].
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use stratum_features::analyze_file;
///
/// let report = analyze_file(Path::new("track.flac"))?;
/// assert_eq!(report.record.to_fields().len(), stratum_features::Record::header().len());
/// # Ok::<(), stratum_features::FeatureError>(())
/// ```
pub fn analyze_file(path: &Path) -> Result<FileReport, FeatureError> {
    analyze_file_with_config(path, &ExtractionConfig::default())
}

/// Analyze one audio file with custom extraction parameters
///
/// See [`analyze_file`].
pub fn analyze_file_with_config(
    path: &Path,
    config: &ExtractionConfig,
) -> Result<FileReport, FeatureError> {
    let waveform = io::decoder::decode_file(path)?;
    let filepath = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Ok(analyze_waveform(&filepath, &waveform, config))
}

/// Analyze an already decoded waveform
///
/// `path` is only used to fill the row's file columns.
pub fn analyze_waveform(path: &Path, waveform: &Waveform, config: &ExtractionConfig) -> FileReport {
    log::debug!(
        "Analyzing {}: {} samples at {} Hz",
        path.display(),
        waveform.len(),
        waveform.sample_rate()
    );

    let summary = summarize_with_config(waveform, config);
    let record = Record::from_summary(path, waveform, &summary);

    FileReport {
        record,
        warnings: summary.warnings,
    }
}
