//! Analysis and result aggregation modules
//!
//! Combines the extractor outputs of one file into its final row:
//! - Time aggregation and rounding
//! - Fixed-schema records

pub mod aggregate;
pub mod record;
