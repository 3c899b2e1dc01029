// Command-line runner: decode an image, recolor its purple pixels, encode the result.

use anyhow::{Context, Result};
use clap::Parser;
use purple_shift::core_modules::utils::image_helper::image_helper;
use purple_shift::pipeline::{DEFAULT_THREADS, ExecutionMode, RecolorConfig, RecolorPipeline};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "purple_shift", about = "Recolor purple pixels of an image toward yellow")]
struct Args {
    /// Image to read.
    input: PathBuf,

    /// Where to write the result; the format follows the extension.
    output: PathBuf,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// Use one worker per logical CPU instead of --threads.
    #[arg(long, conflicts_with = "threads")]
    auto_threads: bool,

    /// Run on the calling thread only.
    #[arg(long)]
    sequential: bool,
}

impl Args {
    fn config(&self) -> RecolorConfig {
        let mut config = if self.auto_threads {
            RecolorConfig::from_available_parallelism()
        } else {
            RecolorConfig {
                threads: self.threads,
                ..RecolorConfig::default()
            }
        };
        if self.sequential {
            config.mode = ExecutionMode::Sequential;
        }
        config
    }
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.config();

    let source = image_helper::load(&args.input)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;
    info!(
        width = source.width(),
        height = source.height(),
        threads = config.threads,
        mode = ?config.mode,
        "loaded {}",
        args.input.display()
    );

    let pipeline = RecolorPipeline::new(config);
    let started = Instant::now();
    let (destination, report) = pipeline.run(&source).context("recolor failed")?;
    let elapsed = started.elapsed();

    image_helper::save(&args.output, &destination)
        .with_context(|| format!("failed to encode {}", args.output.display()))?;

    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        pixels = report.pixels_written(),
        recolored = report.pixels_recolored(),
        "wrote {}",
        args.output.display()
    );
    Ok(())
}
