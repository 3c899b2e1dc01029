// THEORY:
// The `pipeline` module is the top-level API of the recolor engine. It holds the
// tunable configuration, the report types every driver returns, and the
// sequential driver that the parallel drivers must agree with bit for bit.
//
// A caller builds a `RecolorConfig`, hands it to a `RecolorPipeline`, and runs it
// over a decoded `ImageGrid`. The pipeline allocates the zeroed destination,
// dispatches to the configured driver, and returns the filled grid with a report.

use crate::core_modules::recolor::recolor_region;
use crate::error::TransformError;
use crate::parallel_pipeline::transform;
use std::time::{Duration, Instant};
use tracing::debug;

// Re-export key data structures for the public API.
pub use crate::core_modules::grid::ImageGrid;
pub use crate::core_modules::recolor::RegionOutcome;
pub use crate::core_modules::region::Region;

/// Worker count used when the caller does not pick one.
pub const DEFAULT_THREADS: usize = 8;

/// Which driver a `RecolorPipeline` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One region covering the whole image, on the calling thread.
    Sequential,
    /// One OS thread per horizontal band.
    Parallel,
}

/// Configuration for the RecolorPipeline.
#[derive(Debug, Clone)]
pub struct RecolorConfig {
    /// Number of bands, and so of worker threads, in parallel mode.
    pub threads: usize,
    pub mode: ExecutionMode,
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            mode: ExecutionMode::Parallel,
        }
    }
}

impl RecolorConfig {
    /// One worker per logical CPU.
    pub fn from_available_parallelism() -> Self {
        Self {
            threads: num_cpus::get().max(1),
            ..Self::default()
        }
    }

    pub fn sequential() -> Self {
        Self {
            threads: 1,
            mode: ExecutionMode::Sequential,
        }
    }
}

/// What one worker did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub region: Region,
    pub outcome: RegionOutcome,
}

/// The result of one transform invocation.
#[derive(Debug, Clone)]
pub struct TransformReport {
    pub threads: usize,
    pub workers: Vec<WorkerReport>,
    pub elapsed: Duration,
}

impl TransformReport {
    /// Every worker's outcome folded into one.
    pub fn total(&self) -> RegionOutcome {
        self.workers
            .iter()
            .fold(RegionOutcome::default(), |total, w| total.merge(w.outcome))
    }

    pub fn pixels_written(&self) -> u64 {
        self.total().pixels_written
    }

    pub fn pixels_recolored(&self) -> u64 {
        self.total().pixels_recolored
    }
}

pub(crate) fn check_dimensions(source: &ImageGrid, destination: &ImageGrid) -> Result<(), TransformError> {
    if source.dimensions() != destination.dimensions() {
        return Err(TransformError::DimensionMismatch {
            expected_width: source.width(),
            expected_height: source.height(),
            found_width: destination.width(),
            found_height: destination.height(),
        });
    }
    Ok(())
}

/// Recolors the whole image on the calling thread.
pub fn recolor_single(source: &ImageGrid, destination: &mut ImageGrid) -> Result<TransformReport, TransformError> {
    check_dimensions(source, destination)?;
    let started = Instant::now();
    let region = Region::full(source.width(), source.height());
    let outcome = recolor_region(source, &mut destination.as_band(), &region);
    debug!(pixels = outcome.pixels_written, recolored = outcome.pixels_recolored, "sequential recolor done");

    Ok(TransformReport {
        threads: 1,
        workers: vec![WorkerReport {
            worker: 0,
            region,
            outcome,
        }],
        elapsed: started.elapsed(),
    })
}

/// The main, top-level struct for the recolor engine.
pub struct RecolorPipeline {
    config: RecolorConfig,
}

impl RecolorPipeline {
    pub fn new(config: RecolorConfig) -> Self {
        Self { config }
    }

    /// Recolors `source` into a freshly allocated grid.
    pub fn run(&self, source: &ImageGrid) -> Result<(ImageGrid, TransformReport), TransformError> {
        let mut destination = ImageGrid::new(source.width(), source.height());
        let report = self.run_into(source, &mut destination)?;
        Ok((destination, report))
    }

    /// Recolors `source` into a caller-supplied grid of the same dimensions.
    pub fn run_into(&self, source: &ImageGrid, destination: &mut ImageGrid) -> Result<TransformReport, TransformError> {
        match self.config.mode {
            ExecutionMode::Sequential => recolor_single(source, destination),
            ExecutionMode::Parallel => transform(source, destination, self.config.threads),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::pack;

    fn sample_grid() -> ImageGrid {
        let pixels = [
            pack(100, 40, 60),
            pack(10, 10, 10),
            pack(250, 180, 200),
            pack(0, 255, 0),
            pack(150, 80, 100),
            pack(255, 255, 255),
        ];
        ImageGrid::from_packed(3, 2, pixels.to_vec()).unwrap()
    }

    #[test]
    fn default_config_uses_eight_parallel_workers() {
        let config = RecolorConfig::default();
        assert_eq!(config.threads, DEFAULT_THREADS);
        assert_eq!(config.mode, ExecutionMode::Parallel);
        assert!(RecolorConfig::from_available_parallelism().threads >= 1);
    }

    #[test]
    fn sequential_run_reports_counts() {
        let pipeline = RecolorPipeline::new(RecolorConfig::sequential());
        let (destination, report) = pipeline.run(&sample_grid()).unwrap();
        assert_eq!(report.threads, 1);
        assert_eq!(report.pixels_written(), 6);
        assert_eq!(report.pixels_recolored(), 3);
        assert_eq!(destination.get(0, 0), pack(140, 90, 0));
        assert_eq!(destination.get(1, 0), pack(10, 10, 10));
    }

    #[test]
    fn modes_agree() {
        let source = sample_grid();
        let (sequential, _) = RecolorPipeline::new(RecolorConfig::sequential()).run(&source).unwrap();
        let (parallel, report) = RecolorPipeline::new(RecolorConfig::default()).run(&source).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(report.workers.len(), DEFAULT_THREADS);
        assert_eq!(report.pixels_written(), 6);
    }

    #[test]
    fn report_total_sums_every_worker() {
        let mut destination = ImageGrid::new(3, 2);
        let report = transform(&sample_grid(), &mut destination, 2).unwrap();
        assert_eq!(report.workers.len(), 2);
        assert_eq!(report.workers[0].outcome, RegionOutcome { pixels_written: 3, pixels_recolored: 2 });
        assert_eq!(report.workers[1].outcome, RegionOutcome { pixels_written: 3, pixels_recolored: 1 });
        assert_eq!(report.total(), RegionOutcome { pixels_written: 6, pixels_recolored: 3 });
    }

    #[test]
    fn mismatched_destination_is_rejected() {
        let mut destination = ImageGrid::new(2, 2);
        let err = recolor_single(&sample_grid(), &mut destination).unwrap_err();
        assert!(matches!(
            err,
            TransformError::DimensionMismatch {
                expected_width: 3,
                expected_height: 2,
                found_width: 2,
                found_height: 2
            }
        ));
    }
}
