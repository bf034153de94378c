// Error types for the derma_vision library.
//
// Only the boundaries fail: buffer geometry, image decoding, file IO, configuration
// and background tasks. The scoring functions themselves are total over valid
// aggregates and never return an error.

use thiserror::Error;

/// Main error type for the vision library.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("pixel buffer of {len} bytes is not a whole number of RGBA pixels")]
    MisalignedBuffer { len: usize },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("sampling stride must be at least one pixel")]
    InvalidStride,

    #[error("region {width}x{height} at ({x}, {y}) does not overlap the {frame_width}x{frame_height} frame")]
    EmptyRegion {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("image decoding error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("live session has already shut down")]
    SessionClosed,

    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type alias for vision operations.
pub type Result<T> = std::result::Result<T, VisionError>;
