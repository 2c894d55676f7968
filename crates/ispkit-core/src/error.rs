//! Error types for ispkit-core
//!
//! Provides a unified error type for buffer construction and access.
//! Each variant captures enough context for diagnostics without exposing
//! internal layout details.

use thiserror::Error;

/// ispkit core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel buffer length does not match the requested shape
    #[error("buffer size mismatch: {width}x{height}x{channels} needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        channels: u32,
        expected: usize,
        actual: usize,
    },

    /// Index out of bounds
    #[error("index out of bounds: ({x}, {y}) outside {width}x{height}")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type alias for ispkit core operations
pub type Result<T> = std::result::Result<T, Error>;
