//! Error types for ispkit-clahe
//!
//! Every configuration problem is detected before any histogram is
//! built, so a failed call never leaves partial results behind.

use thiserror::Error;

/// Errors that can occur while configuring or running the equalizer
#[derive(Debug, Error)]
pub enum ClaheError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] ispkit_core::Error),

    /// Tile grid with zero tiles per axis
    #[error("invalid configuration: block must be >= 1")]
    ZeroBlock,

    /// Image sides are not multiples of the tile grid
    #[error(
        "invalid configuration: {width}x{height} image does not split evenly \
         (sides must be multiples of {divisor})"
    )]
    Indivisible {
        width: u32,
        height: u32,
        divisor: u32,
    },

    /// The fixed-point path is built for one grid size only
    #[error("invalid configuration: fixed-point path requires block = {expected}, got {actual}")]
    UnsupportedBlock { expected: u32, actual: u32 },

    /// Tiles too small for the fixed-point output scale
    #[error("invalid configuration: {total}-pixel tiles give a zero fixed-point scale")]
    DegenerateScale { total: u64 },
}

impl ClaheError {
    /// Whether the error stems from configuration rather than input data.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, ClaheError::Core(_))
    }
}

/// Result type for CLAHE operations
pub type ClaheResult<T> = Result<T, ClaheError>;
