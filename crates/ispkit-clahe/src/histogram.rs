//! Per-tile intensity histograms

use crate::grid::TileGrid;
use crate::{ClaheError, ClaheResult};
use ispkit_core::{LEVELS, Plane};
use rayon::prelude::*;

/// 256-bin histogram of one tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileHistogram {
    bins: [u32; LEVELS],
}

impl Default for TileHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl TileHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self { bins: [0; LEVELS] }
    }

    /// Wrap precomputed bin counts.
    pub fn from_bins(bins: [u32; LEVELS]) -> Self {
        Self { bins }
    }

    /// Bin counts indexed by intensity.
    #[inline]
    pub fn bins(&self) -> &[u32; LEVELS] {
        &self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [u32; LEVELS] {
        &mut self.bins
    }

    /// Count for one intensity.
    #[inline]
    pub fn count(&self, level: u8) -> u32 {
        self.bins[level as usize]
    }

    /// Sum of all bins.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Add one sample.
    #[inline]
    pub fn add(&mut self, level: u8) {
        self.bins[level as usize] += 1;
    }
}

/// Build one histogram per tile, in row-major tile order.
///
/// # Errors
///
/// Returns [`ClaheError::Core`] with a dimension mismatch if the plane
/// does not have the grid's shape.
pub fn build_histograms(plane: &Plane, grid: &TileGrid) -> ClaheResult<Vec<TileHistogram>> {
    if plane.dimensions() != (grid.width(), grid.height()) {
        return Err(ClaheError::Core(ispkit_core::Error::DimensionMismatch {
            expected: (grid.width(), grid.height()),
            actual: plane.dimensions(),
        }));
    }

    let histograms = (0..grid.tile_count())
        .into_par_iter()
        .map(|tile| {
            let (x0, y0, x1, y1) = grid.tile_bounds(tile);
            let mut hist = TileHistogram::new();
            for y in y0..y1 {
                for &v in &plane.row(y)[x0 as usize..x1 as usize] {
                    hist.add(v);
                }
            }
            hist
        })
        .collect();

    Ok(histograms)
}
