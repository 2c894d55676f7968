//! Address stage of the interpolation engine
//!
//! For every output pixel this stage decides which tile CDFs contribute
//! and with what raw integer offsets, without touching any CDF. The
//! result is a [`Neighborhood`]: one of the corner, edge or interior
//! cases. Both backends consume the same neighbourhoods, so they always
//! agree on case selection and differ only in arithmetic.
//!
//! Column and row classification are independent, so an [`AddressPlan`]
//! computes each once per image and reuses it for every pixel (and for
//! every channel when the same grid is applied more than once).

use crate::grid::{AxisSpan, TileGrid};

/// Axis along which an edge pixel blends two tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Top and bottom borders: neighbours left and right
    Horizontal,
    /// Left and right borders: neighbours above and below
    Vertical,
}

/// Tiles contributing to one output pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// One tile, copied
    Corner { tile: usize },
    /// Two tiles blended along `axis`; `offset` is measured from the
    /// centre of `near` towards `far`
    Edge {
        axis: Axis,
        near: usize,
        far: usize,
        offset: u32,
    },
    /// Four tiles blended bilinearly; `u` runs west to east, `v` north
    /// to south
    Interior {
        nw: usize,
        ne: usize,
        sw: usize,
        se: usize,
        u: u32,
        v: u32,
    },
}

/// Four tile indices in (up-left, up-right, down-left, down-right) order
/// plus the raw offsets, as fed to the hardware weighted-sum unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    pub tiles: [usize; 4],
    pub u: u32,
    pub v: u32,
}

impl Neighborhood {
    /// Combine a row and a column classification.
    pub fn from_spans(grid: &TileGrid, row: AxisSpan, col: AxisSpan) -> Self {
        let at = |r: u32, c: u32| grid.tile_index(r, c);
        match (row, col) {
            (AxisSpan::Clamped { tile: r }, AxisSpan::Clamped { tile: c }) => {
                Neighborhood::Corner { tile: at(r, c) }
            }
            (AxisSpan::Clamped { tile: r }, AxisSpan::Between { lower: c, offset }) => {
                Neighborhood::Edge {
                    axis: Axis::Horizontal,
                    near: at(r, c),
                    far: at(r, c + 1),
                    offset,
                }
            }
            (AxisSpan::Between { lower: r, offset }, AxisSpan::Clamped { tile: c }) => {
                Neighborhood::Edge {
                    axis: Axis::Vertical,
                    near: at(r, c),
                    far: at(r + 1, c),
                    offset,
                }
            }
            (AxisSpan::Between { lower: r, offset: v }, AxisSpan::Between { lower: c, offset: u }) => {
                Neighborhood::Interior {
                    nw: at(r, c),
                    ne: at(r, c + 1),
                    sw: at(r + 1, c),
                    se: at(r + 1, c + 1),
                    u,
                    v,
                }
            }
        }
    }

    /// Classify pixel (x, y).
    pub fn locate(grid: &TileGrid, x: u32, y: u32) -> Self {
        Self::from_spans(grid, grid.row_span(y), grid.column_span(x))
    }

    /// Expand to the four-tile form, duplicating tiles where the case
    /// has fewer than four.
    pub fn quad(&self) -> Quad {
        match *self {
            Neighborhood::Corner { tile } => Quad {
                tiles: [tile; 4],
                u: 0,
                v: 0,
            },
            Neighborhood::Edge {
                axis: Axis::Horizontal,
                near,
                far,
                offset,
            } => Quad {
                tiles: [near, far, near, far],
                u: offset,
                v: 0,
            },
            Neighborhood::Edge {
                axis: Axis::Vertical,
                near,
                far,
                offset,
            } => Quad {
                tiles: [near, near, far, far],
                u: 0,
                v: offset,
            },
            Neighborhood::Interior {
                nw,
                ne,
                sw,
                se,
                u,
                v,
            } => Quad {
                tiles: [nw, ne, sw, se],
                u,
                v,
            },
        }
    }

    /// Distinct tiles referenced, in quad order.
    pub fn tiles(&self) -> Vec<usize> {
        match *self {
            Neighborhood::Corner { tile } => vec![tile],
            Neighborhood::Edge { near, far, .. } => vec![near, far],
            Neighborhood::Interior { nw, ne, sw, se, .. } => vec![nw, ne, sw, se],
        }
    }
}

/// Precomputed row and column classifications for one grid
#[derive(Debug, Clone)]
pub struct AddressPlan {
    grid: TileGrid,
    rows: Vec<AxisSpan>,
    cols: Vec<AxisSpan>,
}

impl AddressPlan {
    /// Classify every row and column of `grid`.
    pub fn new(grid: &TileGrid) -> Self {
        let rows = (0..grid.height()).map(|y| grid.row_span(y)).collect();
        let cols = (0..grid.width()).map(|x| grid.column_span(x)).collect();
        Self {
            grid: *grid,
            rows,
            cols,
        }
    }

    /// Grid the plan was built for.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Neighbourhood of pixel (x, y).
    #[inline]
    pub fn neighborhood(&self, x: u32, y: u32) -> Neighborhood {
        Neighborhood::from_spans(&self.grid, self.rows[y as usize], self.cols[x as usize])
    }

    /// Classification of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> AxisSpan {
        self.rows[y as usize]
    }

    /// Column classifications, left to right.
    #[inline]
    pub fn columns(&self) -> &[AxisSpan] {
        &self.cols
    }
}
