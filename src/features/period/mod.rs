//! Period estimation modules
//!
//! Convert an onset strength envelope to a single dominant tempo using
//! autocorrelation with a log-normal tempo prior.

pub mod autocorrelation;

/// Dominant tempo estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEstimate {
    /// Tempo in beats per minute
    pub bpm: f32,

    /// Autocorrelation at the chosen lag relative to lag zero (0.0-1.0)
    pub periodicity: f32,

    /// Chosen lag in frames
    pub lag: usize,
}
