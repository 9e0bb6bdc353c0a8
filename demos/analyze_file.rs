//! Example: Analyze a single audio file
//!
//! Prints the summary row that the batch tool would write for one file.
//!
//! ```text
//! cargo run --example analyze_file -- path/to/track.wav
//! ```

use std::path::PathBuf;

use stratum_features::features::chroma::PITCH_CLASSES;
use stratum_features::{analyze_file, Record};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let path: PathBuf = std::env::args()
        .nth(1)
        .ok_or("usage: analyze_file <audio file>")?
        .into();

    let report = analyze_file(&path)?;
    let record = &report.record;

    println!("Analysis Results: {}", record.filename);
    println!("  Duration: {:.3} s at {} Hz", record.duration_seconds, record.sample_rate);
    match record.tempo {
        Some(bpm) => println!("  Tempo: {:.2} BPM", bpm),
        None => println!("  Tempo: (none)"),
    }
    if let Some(centroid) = record.spectral_centroid_mean {
        println!("  Spectral centroid: {:.1} Hz", centroid);
    }
    if let Some(mfcc) = record.mfcc_mean {
        println!("  MFCC: {:?}", mfcc);
    }
    if let Some(chroma) = record.chroma_mean {
        for (name, value) in PITCH_CLASSES.iter().zip(chroma.iter()) {
            println!("  {:>2}: {:.3}", name, value);
        }
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }

    println!();
    println!("{}", Record::header().join(","));
    println!("{}", record.to_fields().join(","));

    Ok(())
}
