//! I/O error types
//!
//! Every reader and writer in this crate maps its underlying failures
//! into `IoError`, so callers handle one error type whether the data
//! came from a PNG file or an RTL simulation dump.

use thiserror::Error;

/// Error type for image and text I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The format is not supported or not enabled via features
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The data is structurally invalid
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A line of a hex dump could not be parsed
    #[error("line {line}: invalid hex value {text:?}")]
    HexParse { line: usize, text: String },

    /// A hex dump holds the wrong number of entries
    #[error("expected {expected} entries, found {actual}")]
    EntryCount { expected: usize, actual: usize },

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library
    #[error("core error: {0}")]
    Core(#[from] ispkit_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
