//! Numeric backends
//!
//! The equalizer is generic over a [`Backend`], which fixes everything
//! that depends on number representation: the clip limit, how a limited
//! histogram becomes a CDF, and how the CDF values of a neighbourhood are
//! blended into an output intensity. Tile partitioning and case selection
//! are shared.
//!
//! - [`Reference`]: `f64` CDFs, real-valued bilinear weights, output
//!   `trunc(255 * value)`.
//! - [`FixedPoint`]: integer CDFs and the exact truncating arithmetic of
//!   the RTL weighted-sum unit.

use crate::cdf::{FixedCdf, HARDWARE_CDF_DIVISOR, ReferenceCdf};
use crate::grid::TileGrid;
use crate::histogram::TileHistogram;
use crate::limiter::{hardware_limit, reference_limit};
use crate::neighborhood::{Axis, Neighborhood};
use crate::{ClaheError, ClaheResult};
use ispkit_core::MAX_LEVEL;

/// Grid size the fixed-point datapath is synthesized for
pub const HARDWARE_BLOCK: u32 = 8;

/// Per-stage divisor inside the weighted-sum unit
pub const BLEND_DIVISOR: u64 = 256;

/// Number representation used by the equalizer
pub trait Backend: Sized + Sync {
    /// Per-tile mapping table
    type Cdf: Send + Sync;

    /// Short name used in logs
    const NAME: &'static str;

    /// Validate the configuration and derive the backend's constants.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the image cannot be tiled the way
    /// this backend requires.
    fn configure(width: u32, height: u32, block: u32) -> ClaheResult<Self>;

    /// Tile grid the backend was configured for.
    fn grid(&self) -> &TileGrid;

    /// Per-bin clip limit.
    fn clip_limit(&self) -> u32;

    /// Turn a limited histogram into a mapping table.
    fn build_cdf(&self, hist: &TileHistogram) -> Self::Cdf;

    /// Blend the mappings of `level` in the neighbourhood's tiles.
    fn map(&self, cdfs: &[Self::Cdf], neighborhood: &Neighborhood, level: u8) -> u8;
}

// ============================================================================
// Floating-point reference
// ============================================================================

/// Floating-point reference backend
///
/// Requires tile sides to be even so tile centres fall on whole pixels.
#[derive(Debug, Clone)]
pub struct Reference {
    grid: TileGrid,
    limit: u32,
}

impl Reference {
    /// Tile sides must be multiples of this
    pub const TILE_ALIGNMENT: u32 = 2;

    fn weight(offset: u32, extent: u32) -> f64 {
        offset as f64 / extent as f64
    }
}

impl Backend for Reference {
    type Cdf = ReferenceCdf;

    const NAME: &'static str = "reference";

    fn configure(width: u32, height: u32, block: u32) -> ClaheResult<Self> {
        let grid = TileGrid::aligned(width, height, block, Self::TILE_ALIGNMENT)?;
        let limit = reference_limit(grid.tile_pixels());
        log::debug!(
            "{}: {}x{} image, {}x{} tiles of {}x{}, total {}, limit {}",
            Self::NAME,
            width,
            height,
            block,
            block,
            grid.tile_width(),
            grid.tile_height(),
            grid.tile_pixels(),
            limit
        );
        Ok(Self { grid, limit })
    }

    fn grid(&self) -> &TileGrid {
        &self.grid
    }

    fn clip_limit(&self) -> u32 {
        self.limit
    }

    fn build_cdf(&self, hist: &TileHistogram) -> ReferenceCdf {
        ReferenceCdf::from_histogram(hist, self.grid.tile_pixels())
    }

    fn map(&self, cdfs: &[ReferenceCdf], neighborhood: &Neighborhood, level: u8) -> u8 {
        let value = match *neighborhood {
            Neighborhood::Corner { tile } => cdfs[tile].get(level),
            Neighborhood::Edge {
                axis,
                near,
                far,
                offset,
            } => {
                let extent = match axis {
                    Axis::Horizontal => self.grid.tile_width(),
                    Axis::Vertical => self.grid.tile_height(),
                };
                let p = Self::weight(offset, extent);
                let q = 1.0 - p;
                q * cdfs[near].get(level) + p * cdfs[far].get(level)
            }
            Neighborhood::Interior {
                nw,
                ne,
                sw,
                se,
                u,
                v,
            } => {
                let u = Self::weight(u, self.grid.tile_width());
                let v = Self::weight(v, self.grid.tile_height());
                (1.0 - u) * (1.0 - v) * cdfs[nw].get(level)
                    + (1.0 - u) * v * cdfs[sw].get(level)
                    + u * v * cdfs[se].get(level)
                    + u * (1.0 - v) * cdfs[ne].get(level)
            }
        };
        // `as` truncates toward zero and saturates
        (MAX_LEVEL as f64 * value) as u8
    }
}

// ============================================================================
// Fixed-point hardware model
// ============================================================================

/// Constants of the fixed-point datapath for one image size
///
/// These are the values the RTL derives from the frame geometry; they are
/// exposed so a hardware simulation can be configured from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointParams {
    tile_width: u32,
    tile_height: u32,
    total: u64,
    limit: u32,
    scale: u64,
}

impl FixedPointParams {
    /// Derive the datapath constants for `grid`.
    ///
    /// `scale = total^2 / 255 / 128 / 256`, truncating at every step. It
    /// folds the bilinear normalization (`/ total`), the CDF divisor and
    /// the blend divisor into one output divisor.
    ///
    /// # Errors
    ///
    /// Returns [`ClaheError::DegenerateScale`] if tiles are too small for
    /// `scale` to be nonzero.
    pub fn new(grid: &TileGrid) -> ClaheResult<Self> {
        let total = grid.tile_pixels();
        let scale = total * total
            / MAX_LEVEL as u64
            / HARDWARE_CDF_DIVISOR as u64
            / BLEND_DIVISOR;
        if scale == 0 {
            return Err(ClaheError::DegenerateScale { total });
        }
        Ok(Self {
            tile_width: grid.tile_width(),
            tile_height: grid.tile_height(),
            total,
            limit: hardware_limit(total),
            scale,
        })
    }

    /// Tile width (`factor_w`).
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height (`factor_h`).
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Pixels per tile.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Clip limit, `4 * total / 256`.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Output divisor.
    pub fn scale(&self) -> u64 {
        self.scale
    }

    /// Weighted sum of four CDF values.
    ///
    /// `c` is (up-left, up-right, down-left, down-right); `u` and `v` are
    /// raw pixel offsets from the up-left tile centre.
    #[inline]
    pub fn weighted_average(&self, c: [u32; 4], u: u32, v: u32) -> u64 {
        let fh = self.tile_height as u64;
        let fw = self.tile_width as u64;
        let (u, v) = (u as u64, v as u64);
        let [c0, c1, c2, c3] = c.map(u64::from);

        let left = ((fh - v) * c0 + v * c2) / BLEND_DIVISOR;
        let right = ((fh - v) * c1 + v * c3) / BLEND_DIVISOR;
        (fw - u) * left + u * right
    }

    /// Quotient of a weighted sum by `scale`, before narrowing to 8 bits.
    ///
    /// Can exceed 255: `scale` is truncated, so a tile near the top of its
    /// CDF overshoots.
    #[inline]
    pub fn raw_level(&self, acc: u64) -> u64 {
        acc / self.scale
    }

    /// Reduce a weighted sum to an output level.
    ///
    /// Only the low 8 bits of [`raw_level`](Self::raw_level) are kept, as
    /// in the RTL output register: 256 becomes 0, 448 becomes 192.
    #[inline]
    pub fn to_level(&self, acc: u64) -> u8 {
        (self.raw_level(acc) & 0xff) as u8
    }

    /// Whether a weighted sum overflows the 8-bit output.
    #[inline]
    pub fn overflows(&self, acc: u64) -> bool {
        self.raw_level(acc) > MAX_LEVEL as u64
    }

    /// Largest absolute difference from the reference output, given that
    /// both paths start from the same limited histograms and no output
    /// overflows 8 bits.
    ///
    /// Sums three error sources in output levels: truncating the CDF by
    /// 128, truncating each blend stage by 256, and the truncated `scale`
    /// falling below its exact value. One more level covers the final
    /// truncation on both sides.
    pub fn divergence_bound(&self) -> u32 {
        let total = self.total as f64;
        let scale = self.scale as f64;
        let exact_scale = total * total
            / (MAX_LEVEL as f64 * HARDWARE_CDF_DIVISOR as f64 * BLEND_DIVISOR as f64);

        let cdf_loss = MAX_LEVEL as f64 * HARDWARE_CDF_DIVISOR as f64 / total;
        let blend_loss = self.tile_width as f64 / scale;
        let scale_gain = MAX_LEVEL as f64 * (exact_scale / scale - 1.0);

        (cdf_loss + blend_loss + scale_gain).floor() as u32 + 1
    }
}

/// Fixed-point backend reproducing the RTL datapath
#[derive(Debug, Clone)]
pub struct FixedPoint {
    grid: TileGrid,
    params: FixedPointParams,
}

impl FixedPoint {
    /// Datapath constants.
    pub fn params(&self) -> &FixedPointParams {
        &self.params
    }
}

impl Backend for FixedPoint {
    type Cdf = FixedCdf;

    const NAME: &'static str = "fixed";

    fn configure(width: u32, height: u32, block: u32) -> ClaheResult<Self> {
        if block != HARDWARE_BLOCK {
            return Err(ClaheError::UnsupportedBlock {
                expected: HARDWARE_BLOCK,
                actual: block,
            });
        }
        let grid = TileGrid::new(width, height, block)?;
        let params = FixedPointParams::new(&grid)?;
        log::debug!(
            "{}: {}x{} image, tiles of {}x{}, total {}, limit {}, scale {}",
            Self::NAME,
            width,
            height,
            params.tile_width,
            params.tile_height,
            params.total,
            params.limit,
            params.scale
        );
        Ok(Self { grid, params })
    }

    fn grid(&self) -> &TileGrid {
        &self.grid
    }

    fn clip_limit(&self) -> u32 {
        self.params.limit
    }

    fn build_cdf(&self, hist: &TileHistogram) -> FixedCdf {
        FixedCdf::from_histogram(hist)
    }

    fn map(&self, cdfs: &[FixedCdf], neighborhood: &Neighborhood, level: u8) -> u8 {
        let quad = neighborhood.quad();
        let c = quad.tiles.map(|t| cdfs[t].get(level));
        self.params
            .to_level(self.params.weighted_average(c, quad.u, quad.v))
    }
}
