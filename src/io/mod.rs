//! Audio I/O modules
//!
//! Audio decoding using Symphonia and the mono waveform it produces.

pub mod decoder;
pub mod waveform;
