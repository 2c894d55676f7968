//! Plane comparison for software/hardware parity checks
//!
//! A hardware simulation dumps its output frame; the software model
//! produces the frame it expects. [`ParityReport`] summarizes how far
//! apart the two are: the largest per-pixel absolute difference, the
//! mean absolute difference, and the number of differing pixels.

use crate::error::{Error, Result};
use crate::plane::Plane;

/// Result of comparing two equally sized planes
#[derive(Debug, Clone, PartialEq)]
pub struct ParityReport {
    /// Largest absolute per-pixel difference
    pub max_error: u8,
    /// Mean absolute per-pixel difference
    pub mean_error: f64,
    /// Number of pixels that differ
    pub mismatches: u64,
    /// Position of the first differing pixel in row-major order
    pub first_mismatch: Option<(u32, u32)>,
}

impl ParityReport {
    /// Whether the planes are bit-exact.
    pub fn is_exact(&self) -> bool {
        self.mismatches == 0
    }

    /// Whether every pixel is within `tolerance` levels.
    pub fn within(&self, tolerance: u8) -> bool {
        self.max_error <= tolerance
    }
}

impl Plane {
    /// Compare this plane against `other` pixel by pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the planes differ in shape.
    pub fn parity(&self, other: &Plane) -> Result<ParityReport> {
        if !self.sizes_equal(other) {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }

        let width = self.width() as usize;
        let mut max_error = 0u8;
        let mut sum = 0u64;
        let mut mismatches = 0u64;
        let mut first_mismatch = None;

        for (i, (&a, &b)) in self.data().iter().zip(other.data()).enumerate() {
            let d = a.abs_diff(b);
            if d == 0 {
                continue;
            }
            if first_mismatch.is_none() {
                first_mismatch = Some(((i % width) as u32, (i / width) as u32));
            }
            mismatches += 1;
            sum += d as u64;
            max_error = max_error.max(d);
        }

        Ok(ParityReport {
            max_error,
            mean_error: sum as f64 / self.data().len() as f64,
            mismatches,
            first_mismatch,
        })
    }
}
