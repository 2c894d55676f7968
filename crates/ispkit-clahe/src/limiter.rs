//! Contrast limiting
//!
//! Each histogram bin is capped at a clip limit. The counts removed from
//! over-full bins are pooled and handed back evenly across all 256 bins,
//! which bounds the slope of the tile's mapping and so the local contrast
//! gain. The remainder that does not divide evenly is dropped.

use crate::histogram::TileHistogram;
use ispkit_core::LEVELS;

/// Clip limit as a multiple of the mean bin occupancy.
pub const CLIP_MULTIPLIER: u64 = 4;

/// Clip limit used by the floating-point path: `4 * (total / 255)`.
pub fn reference_limit(total: u64) -> u32 {
    (CLIP_MULTIPLIER * (total / 255)) as u32
}

/// Clip limit used by the fixed-point path: `4 * total / 256`.
///
/// A power-of-two divisor so the hardware computes it with a shift.
pub fn hardware_limit(total: u64) -> u32 {
    (CLIP_MULTIPLIER * total / LEVELS as u64) as u32
}

/// Bookkeeping from one clip pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipStats {
    /// Counts removed from bins above the limit
    pub steal: u64,
    /// Amount added back to every bin, `steal / 256`
    pub bonus: u32,
    /// Counts lost to integer division, `steal % 256`
    pub residual: u32,
}

impl TileHistogram {
    /// Clip every bin at `limit` and redistribute the excess.
    ///
    /// The result sums to the original total minus
    /// [`ClipStats::residual`].
    pub fn clip(&mut self, limit: u32) -> ClipStats {
        let bins = self.bins_mut();

        let mut steal = 0u64;
        for bin in bins.iter_mut() {
            if *bin > limit {
                steal += (*bin - limit) as u64;
                *bin = limit;
            }
        }

        let bonus = (steal / LEVELS as u64) as u32;
        let residual = (steal % LEVELS as u64) as u32;
        if bonus > 0 {
            for bin in bins.iter_mut() {
                *bin += bonus;
            }
        }

        ClipStats {
            steal,
            bonus,
            residual,
        }
    }
}
