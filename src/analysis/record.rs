//! Fixed-schema output row

use std::path::Path;

use serde::Serialize;

use super::aggregate::{round_to, FeatureSummary, FeatureWarning};
use crate::config::{FEATURE_DECIMALS, NUM_CHROMA, NUM_MFCC, SCALAR_DECIMALS};
use crate::io::waveform::Waveform;

/// One output row: file identity plus rounded feature summaries
///
/// Column order is given by [`Record::header`] and never depends on the
/// data. Missing values are `None` and serialize to empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Path of the analysed file
    pub filepath: String,

    /// Final path component
    pub filename: String,

    /// Duration in seconds (3 decimals)
    pub duration_seconds: f64,

    /// Native sample rate in Hz
    pub sample_rate: u32,

    /// Tempo in BPM (3 decimals)
    pub tempo: Option<f64>,

    /// Mean spectral centroid in Hz (3 decimals)
    pub spectral_centroid_mean: Option<f64>,

    /// Mean MFCC vector (5 decimals)
    pub mfcc_mean: Option<[f64; NUM_MFCC]>,

    /// Mean chroma vector, index 0 = C (5 decimals)
    pub chroma_mean: Option<[f64; NUM_CHROMA]>,
}

impl Record {
    /// Column names, in output order
    pub fn header() -> Vec<String> {
        let mut columns: Vec<String> = [
            "filepath",
            "filename",
            "duration_seconds",
            "sample_rate",
            "tempo",
            "spectral_centroid_mean",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        columns.extend((0..NUM_MFCC).map(|i| format!("mfcc_mean_{}", i)));
        columns.extend((0..NUM_CHROMA).map(|i| format!("chroma_mean_{}", i)));
        columns
    }

    /// Assemble a row from a file's waveform and feature summary
    pub fn from_summary(path: &Path, waveform: &Waveform, summary: &FeatureSummary) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            filepath: path.display().to_string(),
            filename,
            duration_seconds: round_to(waveform.duration_seconds(), SCALAR_DECIMALS),
            sample_rate: waveform.sample_rate(),
            tempo: summary
                .tempo
                .filter(|t| t.is_finite())
                .map(|t| round_to(t, SCALAR_DECIMALS)),
            spectral_centroid_mean: summary
                .spectral_centroid_mean
                .filter(|c| c.is_finite())
                .map(|c| round_to(c, SCALAR_DECIMALS)),
            mfcc_mean: summary
                .mfcc_mean
                .filter(|v| v.iter().all(|x| x.is_finite()))
                .map(|v| v.map(|x| round_to(x, FEATURE_DECIMALS))),
            chroma_mean: summary
                .chroma_mean
                .filter(|v| v.iter().all(|x| x.is_finite()))
                .map(|v| v.map(|x| round_to(x, FEATURE_DECIMALS))),
        }
    }

    /// String cells matching [`Record::header`]; missing or non-finite
    /// values are empty
    pub fn to_fields(&self) -> Vec<String> {
        fn cell(value: Option<f64>) -> String {
            value
                .filter(|v| v.is_finite())
                .map(|v| v.to_string())
                .unwrap_or_default()
        }

        let mut fields = vec![
            self.filepath.clone(),
            self.filename.clone(),
            self.duration_seconds.to_string(),
            self.sample_rate.to_string(),
            cell(self.tempo),
            cell(self.spectral_centroid_mean),
        ];
        for i in 0..NUM_MFCC {
            fields.push(cell(self.mfcc_mean.map(|v| v[i])));
        }
        for i in 0..NUM_CHROMA {
            fields.push(cell(self.chroma_mean.map(|v| v[i])));
        }
        fields
    }
}

/// Result of analysing one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Output row
    pub record: Record,

    /// Non-fatal conditions noticed while summarizing
    pub warnings: Vec<FeatureWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> FeatureSummary {
        FeatureSummary {
            mfcc_mean: Some([-1.234567; NUM_MFCC]),
            chroma_mean: Some([0.1234567; NUM_CHROMA]),
            spectral_centroid_mean: Some(440.12345),
            tempo: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_header_layout() {
        let header = Record::header();
        assert_eq!(header.len(), 6 + NUM_MFCC + NUM_CHROMA);
        assert_eq!(header[0], "filepath");
        assert_eq!(header[4], "tempo");
        assert_eq!(header[6], "mfcc_mean_0");
        assert_eq!(header[18], "mfcc_mean_12");
        assert_eq!(header[19], "chroma_mean_0");
        assert_eq!(header[30], "chroma_mean_11");
    }

    #[test]
    fn test_from_summary_rounds() {
        let waveform = Waveform::new(vec![0.0; 1000], 3000).unwrap();
        let record = Record::from_summary(Path::new("dir/tone.wav"), &waveform, &summary());

        assert_eq!(record.filename, "tone.wav");
        assert_eq!(record.duration_seconds, 0.333);
        assert_eq!(record.sample_rate, 3000);
        assert_eq!(record.spectral_centroid_mean, Some(440.123));
        assert_eq!(record.mfcc_mean.unwrap()[0], -1.23457);
        assert_eq!(record.chroma_mean.unwrap()[11], 0.12346);
    }

    #[test]
    fn test_non_finite_values_are_empty() {
        let waveform = Waveform::new(vec![0.0; 100], 100).unwrap();
        let mut s = summary();
        s.tempo = Some(f64::INFINITY);
        s.spectral_centroid_mean = Some(f64::NAN);
        s.chroma_mean.as_mut().unwrap()[3] = f64::NAN;
        let record = Record::from_summary(Path::new("a.wav"), &waveform, &s);

        assert_eq!(record.tempo, None);
        assert_eq!(record.spectral_centroid_mean, None);
        assert_eq!(record.chroma_mean, None);
        assert!(record.mfcc_mean.is_some());

        let direct = Record {
            tempo: Some(f64::NAN),
            ..record
        };
        let fields = direct.to_fields();
        assert_eq!(fields[4], "");
        assert!(fields.iter().all(|f| !f.contains("NaN") && !f.contains("inf")));
    }

    #[test]
    fn test_to_fields_missing_values_are_empty() {
        let waveform = Waveform::new(vec![0.0; 100], 100).unwrap();
        let mut s = summary();
        s.chroma_mean = None;
        let record = Record::from_summary(Path::new("a.wav"), &waveform, &s);
        let fields = record.to_fields();

        assert_eq!(fields.len(), Record::header().len());
        assert_eq!(fields[2], "1");
        assert_eq!(fields[4], "");
        assert_eq!(fields[5], "440.123");
        assert!(fields[19..].iter().all(|f| f.is_empty()));
    }
}
