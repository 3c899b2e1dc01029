// THEORY:
// The `parallel_pipeline` module is the transform driver. It partitions the image
// into horizontal bands, runs one worker per band, and joins every worker before
// returning.
//
// Driver states: Partitioning -> Dispatching -> AwaitingCompletion -> Done.
// Worker states: Created -> Running -> Terminated. Nothing is retried or restarted.
//
// 1.  **Threaded**: `transform` spawns N scoped OS threads. The destination is split
//     into disjoint `GridBand`s before dispatch, each moved into exactly one worker;
//     the source is shared by reference.
// 2.  **Async**: `transform_async` runs the same bands on tokio's blocking pool.
//     Each task fills an owned band buffer and the driver stitches them in order.
// 3.  **Failures surface**: every worker's result is collected. After the join
//     phase completes, the first failure (panic, spawn error, cancellation) is
//     returned to the caller.

use crate::core_modules::grid::{GridBand, ImageGrid};
use crate::core_modules::recolor::recolor_region;
use crate::core_modules::region::{Region, partition};
use crate::error::TransformError;
use crate::pipeline::{TransformReport, WorkerReport, check_dimensions};
use futures::future::join_all;
use std::any::Any;
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;
use tracing::{debug, trace, warn};

const WORKER_NAME_PREFIX: &str = "recolor-worker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Partitioning,
    Dispatching,
    AwaitingCompletion,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Running,
    Terminated,
}

/// Runs one worker's band and returns its report.
fn run_worker(source: &ImageGrid, band: &mut GridBand<'_>, worker: usize, region: Region) -> WorkerReport {
    trace!(worker, state = ?WorkerState::Running, top = region.top, rows = band.rows());
    let outcome = recolor_region(source, band, &region);
    trace!(worker, state = ?WorkerState::Terminated, recolored = outcome.pixels_recolored);
    WorkerReport { worker, region, outcome }
}

/// Recolors `source` into `destination` with `threads` worker threads.
pub fn transform(
    source: &ImageGrid,
    destination: &mut ImageGrid,
    threads: usize,
) -> Result<TransformReport, TransformError> {
    if threads == 0 {
        return Err(TransformError::InvalidThreadCount);
    }
    check_dimensions(source, destination)?;
    let started = Instant::now();

    debug!(state = ?DriverState::Partitioning, threads, width = source.width(), height = source.height());
    let regions = partition(source.width(), source.height(), threads);
    let bands = destination.split_into_bands(&regions)?;

    debug!(state = ?DriverState::Dispatching, workers = regions.len());
    let results: Vec<Result<WorkerReport, TransformError>> = thread::scope(|scope| {
        let handles: Vec<_> = regions
            .iter()
            .copied()
            .zip(bands)
            .enumerate()
            .map(|(worker, (region, mut band))| {
                trace!(worker, state = ?WorkerState::Created);
                let spawned = thread::Builder::new()
                    .name(format!("{WORKER_NAME_PREFIX}-{worker}"))
                    .spawn_scoped(scope, move || run_worker(source, &mut band, worker, region));
                (worker, spawned)
            })
            .collect();

        debug!(state = ?DriverState::AwaitingCompletion, workers = handles.len());
        handles
            .into_iter()
            .map(|(worker, spawned)| join_worker(worker, spawned))
            .collect()
    });

    collect_reports(threads, results, started)
}

/// Recolors a shared source on tokio's blocking pool and returns a new grid.
pub async fn transform_async(
    source: Arc<ImageGrid>,
    threads: usize,
) -> Result<(ImageGrid, TransformReport), TransformError> {
    if threads == 0 {
        return Err(TransformError::InvalidThreadCount);
    }
    let started = Instant::now();
    let (width, height) = source.dimensions();

    debug!(state = ?DriverState::Partitioning, threads, width, height);
    let regions = partition(width, height, threads);

    debug!(state = ?DriverState::Dispatching, workers = regions.len());
    let tasks: Vec<_> = regions
        .iter()
        .copied()
        .enumerate()
        .map(|(worker, region)| {
            let source = Arc::clone(&source);
            trace!(worker, state = ?WorkerState::Created);
            tokio::task::spawn_blocking(move || {
                let top = region.top.min(height);
                let rows = region.bottom().min(height) - top;
                let mut pixels = vec![0; rows as usize * width as usize];
                let report = run_worker(&source, &mut GridBand::new(top, width, &mut pixels), worker, region);
                (report, pixels)
            })
        })
        .collect();

    debug!(state = ?DriverState::AwaitingCompletion, workers = tasks.len());
    let joined = join_all(tasks).await;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    let mut results = Vec::with_capacity(joined.len());
    for (worker, joined) in joined.into_iter().enumerate() {
        match joined {
            Ok((report, band)) => {
                pixels.extend_from_slice(&band);
                results.push(Ok(report));
            }
            Err(err) => results.push(Err(join_error(worker, err))),
        }
    }

    let report = collect_reports(threads, results, started)?;
    let destination = ImageGrid::from_packed(width, height, pixels)?;
    Ok((destination, report))
}

fn join_worker(
    worker: usize,
    spawned: std::io::Result<ScopedJoinHandle<'_, WorkerReport>>,
) -> Result<WorkerReport, TransformError> {
    let handle = spawned.map_err(|cause| TransformError::Spawn { worker, cause })?;
    handle.join().map_err(|payload| TransformError::WorkerPanicked {
        worker,
        message: panic_message(&*payload),
    })
}

fn join_error(worker: usize, err: tokio::task::JoinError) -> TransformError {
    if err.is_cancelled() {
        return TransformError::WorkerCancelled { worker };
    }
    match err.try_into_panic() {
        Ok(payload) => TransformError::WorkerPanicked {
            worker,
            message: panic_message(&*payload),
        },
        Err(err) => TransformError::WorkerPanicked {
            worker,
            message: err.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("non-string panic payload")
    }
}

/// Folds per-worker results into a report, or the first failure.
fn collect_reports(
    threads: usize,
    results: Vec<Result<WorkerReport, TransformError>>,
    started: Instant,
) -> Result<TransformReport, TransformError> {
    let mut workers = Vec::with_capacity(results.len());
    let mut first_error = None;

    for result in results {
        match result {
            Ok(report) => workers.push(report),
            Err(err) => {
                warn!(error = %err, "recolor worker failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    let report = TransformReport {
        threads,
        workers,
        elapsed: started.elapsed(),
    };
    debug!(
        state = ?DriverState::Done,
        pixels = report.pixels_written(),
        recolored = report.pixels_recolored(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "transform done"
    );
    Ok(report)
}
