use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    BufferLength { len: usize, width: u32, height: u32 },

    #[error("region {index} starts at row {found_top}, expected row {expected_top}")]
    NonContiguousRegion {
        index: usize,
        expected_top: u32,
        found_top: u32,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error("destination is {found_width}x{found_height}, source is {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("failed to spawn worker {worker}")]
    Spawn {
        worker: usize,
        #[source]
        cause: std::io::Error,
    },

    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("worker {worker} was cancelled before finishing its band")]
    WorkerCancelled { worker: usize },
}

#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Grid(#[from] GridError),
}
