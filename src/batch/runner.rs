//! Failure-isolating batch runner

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::discovery::{collect_inputs, Candidates};
use super::progress::ProgressSink;
use super::sink::{CsvSink, RecordSink};
use crate::analysis::record::Record;
use crate::config::ExtractionConfig;
use crate::error::FeatureError;

/// Outcome of one batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Files that produced a row
    pub processed: usize,

    /// Files that could not be decoded or analysed
    pub failed: usize,

    /// Directory entries ignored because of their extension
    pub skipped: usize,

    /// Wall-clock time of the batch
    pub elapsed: Duration,

    /// Output location (absolute when it could be resolved)
    pub output: PathBuf,
}

/// Sequential batch runner
///
/// Each file is decoded and summarized on its own; a failure is counted and
/// reported, and the next file is processed. Rows are written as soon as
/// they are ready.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    config: ExtractionConfig,
}

impl BatchRunner {
    /// Create a runner with custom extraction parameters
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Process every candidate into `sink`
    ///
    /// Writes the header first, so a batch with no candidates still yields
    /// a header-only table, and flushes the sink before returning.
    ///
    /// # Arguments
    ///
    /// * `candidates` - Files to process, in output order
    /// * `output` - Output location, reported in the summary
    /// * `sink` - Row destination
    /// * `progress` - Progress observer
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::Io` if the sink fails; per-file failures are
    /// counted in the summary instead
    pub fn run<S, P>(
        &self,
        candidates: &Candidates,
        output: &Path,
        sink: &mut S,
        progress: &mut P,
    ) -> Result<BatchSummary, FeatureError>
    where
        S: RecordSink + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let start = Instant::now();
        let total = candidates.files.len();
        let mut processed = 0;
        let mut failed = 0;

        sink.write_header(&Record::header())?;

        for (index, path) in candidates.files.iter().enumerate() {
            progress.file_started(index, total, path);

            match crate::analyze_file_with_config(path, &self.config) {
                Ok(report) => {
                    if let Err(e) = sink.write_record(&report.record) {
                        // Keep whatever was already written
                        if let Err(flush_err) = sink.flush() {
                            log::warn!("Flush after failed write also failed: {}", flush_err);
                        }
                        return Err(e);
                    }
                    processed += 1;
                    progress.file_done(path, &report.warnings);
                }
                Err(e) => {
                    failed += 1;
                    progress.file_failed(path, &e);
                }
            }
        }

        sink.flush()?;

        let summary = BatchSummary {
            processed,
            failed,
            skipped: candidates.skipped,
            elapsed: start.elapsed(),
            output: output.to_path_buf(),
        };
        progress.finished(&summary);
        Ok(summary)
    }
}

/// Run a batch from an input path to a CSV file with default parameters
///
/// Setup happens in a fixed order: the input is validated and its
/// candidates collected before the output is created, so an invalid input
/// never creates or truncates the output file.
///
/// # Errors
///
/// Returns `FeatureError::Setup` for a missing input or uncreatable output,
/// and `FeatureError::Io` if writing fails mid-batch
pub fn run_batch<P>(
    input: &Path,
    output: &Path,
    progress: &mut P,
) -> Result<BatchSummary, FeatureError>
where
    P: ProgressSink + ?Sized,
{
    run_batch_with_config(input, output, &ExtractionConfig::default(), progress)
}

/// Run a batch with custom extraction parameters
///
/// See [`run_batch`].
pub fn run_batch_with_config<P>(
    input: &Path,
    output: &Path,
    config: &ExtractionConfig,
    progress: &mut P,
) -> Result<BatchSummary, FeatureError>
where
    P: ProgressSink + ?Sized,
{
    let candidates = collect_inputs(input)?;
    progress.scan_complete(candidates.files.len(), candidates.skipped);

    let mut sink = CsvSink::create(output)?;
    let output = std::fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());

    BatchRunner::new(config.clone()).run(&candidates, &output, &mut sink, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::progress::NullProgress;

    #[derive(Default)]
    struct MemorySink {
        header: Option<Vec<String>>,
        rows: Vec<Record>,
        flushes: usize,
    }

    impl RecordSink for MemorySink {
        fn write_header(&mut self, header: &[String]) -> Result<(), FeatureError> {
            self.header = Some(header.to_vec());
            Ok(())
        }

        fn write_record(&mut self, record: &Record) -> Result<(), FeatureError> {
            self.rows.push(record.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), FeatureError> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingProgress {
        started: usize,
        failed: usize,
        finished: bool,
    }

    impl ProgressSink for CountingProgress {
        fn file_started(&mut self, _index: usize, _total: usize, _path: &Path) {
            self.started += 1;
        }

        fn file_failed(&mut self, _path: &Path, _error: &FeatureError) {
            self.failed += 1;
        }

        fn finished(&mut self, _summary: &BatchSummary) {
            self.finished = true;
        }
    }

    #[test]
    fn test_empty_batch_writes_header() {
        let mut sink = MemorySink::default();
        let summary = BatchRunner::default()
            .run(
                &Candidates::default(),
                Path::new("out.csv"),
                &mut sink,
                &mut NullProgress,
            )
            .unwrap();

        assert_eq!(sink.header, Some(Record::header()));
        assert!(sink.rows.is_empty());
        assert_eq!(sink.flushes, 1);
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_undecodable_files_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.wav");
        std::fs::write(&bad, b"not audio at all").unwrap();
        let candidates = Candidates {
            files: vec![bad, dir.path().join("vanished.wav")],
            skipped: 3,
        };

        let mut sink = MemorySink::default();
        let mut progress = CountingProgress::default();
        let summary = BatchRunner::default()
            .run(&candidates, Path::new("out.csv"), &mut sink, &mut progress)
            .unwrap();

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(progress.started, 2);
        assert_eq!(progress.failed, 2);
        assert!(progress.finished);
        assert!(sink.rows.is_empty());
    }

    struct FailingSink {
        flushes: usize,
    }

    impl RecordSink for FailingSink {
        fn write_header(&mut self, _header: &[String]) -> Result<(), FeatureError> {
            Ok(())
        }

        fn write_record(&mut self, _record: &Record) -> Result<(), FeatureError> {
            Err(FeatureError::Io("disk full".to_string()))
        }

        fn flush(&mut self) -> Result<(), FeatureError> {
            self.flushes += 1;
            Err(FeatureError::Io("flush failed".to_string()))
        }
    }

    #[test]
    fn test_write_failure_returns_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..4000 {
            writer
                .write_sample(((i as f32 * 0.2).sin() * 8000.0) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();

        let candidates = Candidates {
            files: vec![path],
            skipped: 0,
        };
        let mut sink = FailingSink { flushes: 0 };
        let result = BatchRunner::default().run(
            &candidates,
            Path::new("out.csv"),
            &mut sink,
            &mut NullProgress,
        );

        assert_eq!(result, Err(FeatureError::Io("disk full".to_string())));
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn test_missing_input_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("features.csv");

        let result = run_batch(&dir.path().join("missing"), &output, &mut NullProgress);
        assert!(matches!(result, Err(FeatureError::Setup(_))));
        assert!(!output.exists());
    }
}
