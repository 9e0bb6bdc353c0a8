//! Progress reporting
//!
//! The runner reports through an injectable [`ProgressSink`]; every method
//! has a no-op default so implementations override only what they need.

use std::path::Path;

use super::runner::BatchSummary;
use crate::analysis::aggregate::FeatureWarning;
use crate::error::FeatureError;

/// Observer of batch progress
pub trait ProgressSink {
    /// Input discovery finished
    fn scan_complete(&mut self, _candidates: usize, _skipped: usize) {}

    /// Processing of a file is about to start (`index` is zero-based)
    fn file_started(&mut self, _index: usize, _total: usize, _path: &Path) {}

    /// A file produced a row
    fn file_done(&mut self, _path: &Path, _warnings: &[FeatureWarning]) {}

    /// A file could not be processed and was counted as failed
    fn file_failed(&mut self, _path: &Path, _error: &FeatureError) {}

    /// The batch finished and the output was flushed
    fn finished(&mut self, _summary: &BatchSummary) {}
}

/// Progress reported through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn scan_complete(&mut self, candidates: usize, skipped: usize) {
        log::info!(
            "Found {} audio files ({} other files skipped)",
            candidates,
            skipped
        );
    }

    fn file_started(&mut self, index: usize, total: usize, path: &Path) {
        log::info!("[{}/{}] {}", index + 1, total, path.display());
    }

    fn file_done(&mut self, path: &Path, warnings: &[FeatureWarning]) {
        for warning in warnings {
            log::warn!("{}: {}", path.display(), warning);
        }
    }

    fn file_failed(&mut self, path: &Path, error: &FeatureError) {
        log::error!("Failed to process {}: {}", path.display(), error);
    }

    fn finished(&mut self, summary: &BatchSummary) {
        log::info!(
            "Batch complete: {} processed, {} failed in {:.2}s",
            summary.processed,
            summary.failed,
            summary.elapsed.as_secs_f64()
        );
    }
}

/// Silent progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}
