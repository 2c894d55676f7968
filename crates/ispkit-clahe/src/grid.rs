//! Tile partitioning
//!
//! Splits an image into a `block x block` grid of equally sized tiles and
//! answers the per-axis addressing questions the interpolation stage
//! asks: which tile centres bracket a coordinate, and how far past the
//! lower centre the coordinate lies.

use crate::{ClaheError, ClaheResult};

/// Default number of tiles per axis
pub const DEFAULT_BLOCK: u32 = 8;

/// Position of one coordinate relative to the tile centres on its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSpan {
    /// Outside the outermost centres: only `tile` contributes
    Clamped {
        /// Tile index along the axis
        tile: u32,
    },
    /// Between the centres of `lower` and `lower + 1`
    Between {
        /// Lower tile index along the axis
        lower: u32,
        /// Distance in pixels past the centre of `lower`, `0..extent`
        offset: u32,
    },
}

/// Geometry of a tile grid laid over a `width x height` image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    block: u32,
    tile_width: u32,
    tile_height: u32,
}

impl TileGrid {
    /// Partition a `width x height` image into `block x block` tiles.
    ///
    /// # Errors
    ///
    /// Returns [`ClaheError::ZeroBlock`] if `block == 0` and
    /// [`ClaheError::Indivisible`] if either side is not a multiple of
    /// `block`.
    pub fn new(width: u32, height: u32, block: u32) -> ClaheResult<Self> {
        Self::aligned(width, height, block, 1)
    }

    /// Partition with an extra alignment requirement on the tile sides.
    ///
    /// With `alignment = 2` every tile side is even, so tile centres and
    /// half tiles fall on whole pixels.
    ///
    /// # Errors
    ///
    /// As [`TileGrid::new`], with the sides required to be multiples of
    /// `block * alignment`.
    pub fn aligned(width: u32, height: u32, block: u32, alignment: u32) -> ClaheResult<Self> {
        if block == 0 || alignment == 0 {
            return Err(ClaheError::ZeroBlock);
        }
        let divisor = block.saturating_mul(alignment);
        if width == 0 || height == 0 || width % divisor != 0 || height % divisor != 0 {
            return Err(ClaheError::Indivisible {
                width,
                height,
                divisor,
            });
        }
        Ok(Self {
            width,
            height,
            block,
            tile_width: width / block,
            tile_height: height / block,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tiles per axis.
    #[inline]
    pub fn block(&self) -> u32 {
        self.block
    }

    /// Tile width in pixels.
    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Number of tiles, `block * block`.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.block as usize * self.block as usize
    }

    /// Pixels per tile, `tile_width * tile_height`.
    #[inline]
    pub fn tile_pixels(&self) -> u64 {
        self.tile_width as u64 * self.tile_height as u64
    }

    /// Linear index of the tile at grid position (row, col).
    #[inline]
    pub fn tile_index(&self, row: u32, col: u32) -> usize {
        row as usize * self.block as usize + col as usize
    }

    /// Tile containing pixel (x, y).
    #[inline]
    pub fn tile_of(&self, x: u32, y: u32) -> usize {
        self.tile_index(y / self.tile_height, x / self.tile_width)
    }

    /// Pixel bounds `(x0, y0, x1, y1)` of a tile, end-exclusive.
    pub fn tile_bounds(&self, tile: usize) -> (u32, u32, u32, u32) {
        let row = (tile / self.block as usize) as u32;
        let col = (tile % self.block as usize) as u32;
        let x0 = col * self.tile_width;
        let y0 = row * self.tile_height;
        (x0, y0, x0 + self.tile_width, y0 + self.tile_height)
    }

    /// Locate column `x` relative to the tile centres.
    #[inline]
    pub fn column_span(&self, x: u32) -> AxisSpan {
        axis_span(x, self.tile_width, self.block)
    }

    /// Locate row `y` relative to the tile centres.
    #[inline]
    pub fn row_span(&self, y: u32) -> AxisSpan {
        axis_span(y, self.tile_height, self.block)
    }
}

/// Per-axis addressing.
///
/// A coordinate before its tile's centre pairs with the previous tile;
/// one at or after the centre pairs with the next. The first half of the
/// first tile and the second half of the last tile have no partner.
fn axis_span(pos: u32, extent: u32, block: u32) -> AxisSpan {
    let tile = pos / extent;
    let half = extent / 2;
    let before = pos % extent < half;

    if (tile == 0 && before) || (tile == block - 1 && !before) {
        return AxisSpan::Clamped { tile };
    }

    let lower = if before { tile - 1 } else { tile };
    let centre = lower * extent + half;
    AxisSpan::Between {
        lower,
        offset: pos - centre,
    }
}
