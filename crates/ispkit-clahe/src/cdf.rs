//! Cumulative distribution tables
//!
//! A [`Cdf`] is the per-tile mapping table the interpolation stage reads.
//! The floating-point path stores normalized fractions in `[0, 1]`; the
//! fixed-point path stores truncated integer cumulative counts exactly as
//! the hardware holds them in block RAM.

use crate::histogram::TileHistogram;
use ispkit_core::LEVELS;

/// Divisor applied to the running sum on the fixed-point path
pub const HARDWARE_CDF_DIVISOR: u32 = 128;

/// 256-entry cumulative table for one tile
#[derive(Debug, Clone, PartialEq)]
pub struct Cdf<T> {
    values: [T; LEVELS],
}

/// Real-valued CDF used by the floating-point path
pub type ReferenceCdf = Cdf<f64>;

/// Integer CDF used by the fixed-point path
pub type FixedCdf = Cdf<u32>;

impl<T: Copy + PartialOrd> Cdf<T> {
    /// Wrap a precomputed table.
    pub fn from_values(values: [T; LEVELS]) -> Self {
        Self { values }
    }

    /// Mapping for one intensity.
    #[inline]
    pub fn get(&self, level: u8) -> T {
        self.values[level as usize]
    }

    /// The whole table, indexed by intensity.
    #[inline]
    pub fn values(&self) -> &[T; LEVELS] {
        &self.values
    }

    /// Largest value the tile can map to.
    #[inline]
    pub fn last(&self) -> T {
        self.values[LEVELS - 1]
    }

    /// Whether the table never decreases.
    pub fn is_monotonic(&self) -> bool {
        self.values.windows(2).all(|w| w[0] <= w[1])
    }
}

impl ReferenceCdf {
    /// Accumulate `h[k] / total` term by term.
    ///
    /// `total` is the tile's pixel count before limiting, so the last
    /// entry falls short of 1 by the clip residual.
    pub fn from_histogram(hist: &TileHistogram, total: u64) -> Self {
        let total = total as f64;
        let mut values = [0.0f64; LEVELS];
        let mut acc = 0.0f64;
        for (v, &count) in values.iter_mut().zip(hist.bins()) {
            acc += count as f64 / total;
            *v = acc;
        }
        Self { values }
    }
}

impl FixedCdf {
    /// Integer running sum divided by [`HARDWARE_CDF_DIVISOR`].
    pub fn from_histogram(hist: &TileHistogram) -> Self {
        let mut values = [0u32; LEVELS];
        let mut acc = 0u32;
        for (v, &count) in values.iter_mut().zip(hist.bins()) {
            acc += count;
            *v = acc / HARDWARE_CDF_DIVISOR;
        }
        Self { values }
    }
}
