//! Input discovery

use std::path::{Path, PathBuf};

use crate::config::is_audio_extension;
use crate::error::FeatureError;

/// Files selected for one batch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidates {
    /// Audio files to process, sorted by path
    pub files: Vec<PathBuf>,

    /// Regular files ignored because of their extension
    pub skipped: usize,
}

/// Collect the files to process from an input path
///
/// A directory is scanned non-recursively; regular files with a recognised
/// audio extension (case-insensitive) are kept and sorted by path so row
/// order is reproducible. A path to a single file is used as-is, whatever
/// its extension.
///
/// # Errors
///
/// Returns `FeatureError::Setup` if the path does not exist or the
/// directory cannot be read
pub fn collect_inputs(path: &Path) -> Result<Candidates, FeatureError> {
    if path.is_file() {
        return Ok(Candidates {
            files: vec![path.to_path_buf()],
            skipped: 0,
        });
    }

    if !path.is_dir() {
        return Err(FeatureError::Setup(format!(
            "Input path does not exist or is not a file or directory: {}",
            path.display()
        )));
    }

    let entries = std::fs::read_dir(path).map_err(|e| {
        FeatureError::Setup(format!("Cannot read directory {}: {}", path.display(), e))
    })?;

    let mut candidates = Candidates::default();
    for entry in entries {
        let entry = entry.map_err(|e| {
            FeatureError::Setup(format!("Cannot read directory {}: {}", path.display(), e))
        })?;
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }

        let is_audio = entry_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, is_audio_extension);

        if is_audio {
            candidates.files.push(entry_path);
        } else {
            log::debug!("Skipping non-audio file: {}", entry_path.display());
            candidates.skipped += 1;
        }
    }

    candidates.files.sort();
    Ok(candidates)
}
