//! Record sinks
//!
//! The runner writes rows through [`RecordSink`] so the table format is
//! swappable; [`CsvSink`] is the implementation used by the tool.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::analysis::record::Record;
use crate::error::FeatureError;

/// Destination for output rows
pub trait RecordSink {
    /// Write the column names; called once, before any record
    fn write_header(&mut self, header: &[String]) -> Result<(), FeatureError>;

    /// Write one row
    fn write_record(&mut self, record: &Record) -> Result<(), FeatureError>;

    /// Flush buffered rows to the destination
    fn flush(&mut self) -> Result<(), FeatureError>;
}

/// CSV sink backed by the `csv` crate
///
/// Rows end with `\n`; fields are quoted only when needed. The inner csv
/// writer flushes when dropped.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create (or truncate) a CSV file
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::Setup` if the file cannot be created
    pub fn create(path: &Path) -> Result<Self, FeatureError> {
        let file = File::create(path).map_err(|e| {
            FeatureError::Setup(format!("Cannot create output file {}: {}", path.display(), e))
        })?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        Self { writer }
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::Io` if the final flush fails
    pub fn into_inner(self) -> Result<W, FeatureError> {
        self.writer
            .into_inner()
            .map_err(|e| FeatureError::Io(e.to_string()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_header(&mut self, header: &[String]) -> Result<(), FeatureError> {
        self.writer.write_record(header)?;
        Ok(())
    }

    fn write_record(&mut self, record: &Record) -> Result<(), FeatureError> {
        self.writer.write_record(record.to_fields())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FeatureError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filepath: &str) -> Record {
        Record {
            filepath: filepath.to_string(),
            filename: "x.wav".to_string(),
            duration_seconds: 1.5,
            sample_rate: 22050,
            tempo: None,
            spectral_centroid_mean: Some(1234.5),
            mfcc_mean: None,
            chroma_mean: None,
        }
    }

    #[test]
    fn test_csv_output() {
        let mut sink = CsvSink::from_writer(Vec::new());
        sink.write_header(&Record::header()).unwrap();
        sink.write_record(&record("dir/x.wav")).unwrap();
        sink.flush().unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("filepath,filename,duration_seconds,sample_rate,tempo,"));
        assert!(lines[1].starts_with("dir/x.wav,x.wav,1.5,22050,,1234.5,"));
        assert_eq!(lines[1].split(',').count(), Record::header().len());
        assert!(text.ends_with('\n'));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_paths_with_commas_are_quoted() {
        let mut sink = CsvSink::from_writer(Vec::new());
        sink.write_record(&record("a,b.wav")).unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert!(text.starts_with("\"a,b.wav\","));
    }

    #[test]
    fn test_create_in_missing_directory_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvSink::create(&dir.path().join("no/such/dir/out.csv"));
        assert!(matches!(result, Err(FeatureError::Setup(_))));
    }
}
