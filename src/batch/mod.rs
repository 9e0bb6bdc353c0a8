//! Batch processing
//!
//! Turns a directory (or single file) into one CSV table:
//! - Input discovery
//! - Record sinks
//! - Progress reporting
//! - The failure-isolating runner

pub mod discovery;
pub mod progress;
pub mod runner;
pub mod sink;
