//! Error types for the feature extraction pipeline

use std::fmt;

/// Errors that can occur while extracting features
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Invalid input or output location; fatal before any file is processed
    Setup(String),

    /// A candidate file could not be decoded as audio
    Decode(String),

    /// An extractor produced a matrix with the wrong per-frame width
    ShapeMismatch {
        /// Feature name (e.g. "chroma")
        feature: &'static str,
        /// Expected coefficients per frame
        expected: usize,
        /// Coefficients actually found
        found: usize,
    },

    /// Invalid input parameters
    InvalidInput(String),

    /// Write failure after the output was opened
    Io(String),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::Setup(msg) => write!(f, "Setup error: {}", msg),
            FeatureError::Decode(msg) => write!(f, "Decoding error: {}", msg),
            FeatureError::ShapeMismatch {
                feature,
                expected,
                found,
            } => write!(
                f,
                "Shape mismatch in {}: expected {} coefficients per frame, found {}",
                feature, expected, found
            ),
            FeatureError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            FeatureError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for FeatureError {}

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        FeatureError::Io(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for FeatureError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        FeatureError::Decode(err.to_string())
    }
}

impl From<csv::Error> for FeatureError {
    fn from(err: csv::Error) -> Self {
        FeatureError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = FeatureError::ShapeMismatch {
            feature: "chroma",
            expected: 12,
            found: 11,
        };
        let msg = err.to_string();
        assert!(msg.contains("chroma"));
        assert!(msg.contains("12"));
        assert!(msg.contains("11"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: FeatureError = io.into();
        assert!(matches!(err, FeatureError::Io(_)));
    }
}
