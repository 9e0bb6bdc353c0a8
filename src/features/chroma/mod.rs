//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Tuning estimation
//! - Chroma filterbank construction
//! - Chroma vector computation
//! - Per-frame normalization

pub mod extractor;
pub mod filterbank;
pub mod normalization;
pub mod tuning;

/// Pitch-class names, chroma bin 0 first
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
