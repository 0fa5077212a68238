use anyhow::{Context, Result};

use corner_key_rs::{Config, Pipeline, ProgressTracker};

fn main() -> Result<()> {
    let config = Config::new();
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let batch = config.resolve(&cwd);

    if let Some(message) = batch.threshold.describe() {
        println!("{}", message);
    }

    let tracker = if config.quiet {
        ProgressTracker::hidden()
    } else {
        ProgressTracker::new(batch.images.len() as u64)
    };

    println!("Starting image processing...");
    let pipeline = Pipeline::with_corner_keying(batch);

    // the batch never changes the exit status; every outcome is reported on stdout
    match pipeline.run(&tracker) {
        Ok(report) => println!("\nDone: {}", report),
        Err(e) if e.is_fatal() => {
            println!("ERROR: {}", e);
            println!("Aborting due to directory errors.");
        }
        Err(e) => {
            println!("ERROR: {}", e.chain_message());
            println!("Aborting.");
        }
    }

    Ok(())
}
