// THEORY:
// This file is the entry point for the `purple_shift` library crate. It exposes
// the recolor engine: a `RecolorPipeline` configured by a `RecolorConfig`, the
// threaded and async transform drivers, and the `ImageGrid` they operate on.
//
// The building blocks (channel codec, hue classifier, recolor rule, region
// partitioner) live under `core_modules` and stay public for callers that want to
// drive a single region or classify pixels directly.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use error::{GridError, ImageIoError, TransformError};
pub use parallel_pipeline::{transform, transform_async};
pub use pipeline::{
    ExecutionMode, ImageGrid, RecolorConfig, RecolorPipeline, Region, TransformReport, WorkerReport,
    recolor_single,
};
