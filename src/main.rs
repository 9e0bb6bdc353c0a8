use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use stratum_features::{run_batch, LogProgress};

#[derive(Parser)]
#[command(name = "extract-features")]
#[command(about = "Extract MFCC, spectral centroid, chroma and tempo from audio files into a CSV table")]
struct Args {
    /// Directory of audio files (scanned non-recursively) or a single audio file
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Output CSV file (created or overwritten)
    #[arg(short, long)]
    output_file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    log::info!("Input: {}", args.input_dir.display());
    log::info!("Output: {}", args.output_file.display());

    let summary = run_batch(&args.input_dir, &args.output_file, &mut LogProgress)
        .with_context(|| {
            format!(
                "feature extraction from {} failed",
                args.input_dir.display()
            )
        })?;

    println!("Feature extraction complete");
    println!("  Processed: {}", summary.processed);
    println!("  Failed: {}", summary.failed);
    println!("  Skipped (not audio): {}", summary.skipped);
    println!("  Time: {:.2}s", summary.elapsed.as_secs_f64());
    println!("  Output: {}", summary.output.display());

    Ok(())
}
