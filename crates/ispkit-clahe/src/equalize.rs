//! Contrast-limited adaptive histogram equalization
//!
//! Runs the full pipeline for one backend:
//!
//! 1. Split the plane into tiles and count each tile's histogram
//! 2. Clip every histogram at the backend's limit and redistribute
//! 3. Build one CDF per tile
//! 4. Map each pixel through the CDFs of the tiles around it
//!
//! Steps 1-3 produce [`ClaheTables`], which can be inspected (the
//! parity interface) or applied to the plane. Tiles are processed in
//! parallel in steps 1-3 and rows in step 4.

use crate::backend::{Backend, FixedPoint, Reference};
use crate::grid::DEFAULT_BLOCK;
use crate::histogram::build_histograms;
use crate::limiter::ClipStats;
use crate::neighborhood::{AddressPlan, Neighborhood};
use crate::{ClaheError, ClaheResult};
use ispkit_core::{Plane, RgbImage};
use rayon::prelude::*;

// ============================================================================
// Options
// ============================================================================

/// Options for CLAHE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaheOptions {
    /// Tiles per axis
    pub block: u32,
}

impl Default for ClaheOptions {
    fn default() -> Self {
        Self {
            block: DEFAULT_BLOCK,
        }
    }
}

impl ClaheOptions {
    /// Set the number of tiles per axis.
    pub fn with_block(mut self, block: u32) -> Self {
        self.block = block;
        self
    }
}

// ============================================================================
// Tables
// ============================================================================

/// Per-tile CDFs of one image, ready to be applied
pub struct ClaheTables<B: Backend> {
    backend: B,
    cdfs: Vec<B::Cdf>,
    clip_stats: Vec<ClipStats>,
}

impl<B: Backend> ClaheTables<B> {
    /// Count, clip and accumulate every tile of `plane`.
    ///
    /// # Errors
    ///
    /// Returns an error if `plane` does not match the backend's grid.
    pub fn build(plane: &Plane, backend: B) -> ClaheResult<Self> {
        let grid = *backend.grid();
        let limit = backend.clip_limit();

        let histograms = build_histograms(plane, &grid)?;
        log::trace!("{}: {} histograms built", B::NAME, histograms.len());

        let (cdfs, clip_stats): (Vec<B::Cdf>, Vec<ClipStats>) = histograms
            .into_par_iter()
            .map(|mut hist| {
                let stats = hist.clip(limit);
                (backend.build_cdf(&hist), stats)
            })
            .unzip();

        let clipped = clip_stats.iter().filter(|s| s.steal > 0).count();
        let max_residual = clip_stats.iter().map(|s| s.residual).max().unwrap_or(0);
        log::debug!(
            "{}: {} of {} tiles clipped, largest residual {}",
            B::NAME,
            clipped,
            clip_stats.len(),
            max_residual
        );

        Ok(Self {
            backend,
            cdfs,
            clip_stats,
        })
    }

    /// Backend and its derived constants.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// One CDF per tile, row-major.
    pub fn cdfs(&self) -> &[B::Cdf] {
        &self.cdfs
    }

    /// Clip bookkeeping per tile, row-major.
    pub fn clip_stats(&self) -> &[ClipStats] {
        &self.clip_stats
    }

    /// Equalized value of pixel (x, y) holding `level`.
    pub fn map_pixel(&self, x: u32, y: u32, level: u8) -> u8 {
        let n = Neighborhood::locate(self.backend.grid(), x, y);
        self.backend.map(&self.cdfs, &n, level)
    }

    /// Map every pixel of `plane` through the tables.
    ///
    /// # Errors
    ///
    /// Returns an error if `plane` does not have the grid's shape.
    pub fn apply(&self, plane: &Plane) -> ClaheResult<Plane> {
        let grid = self.backend.grid();
        if plane.dimensions() != (grid.width(), grid.height()) {
            return Err(ClaheError::Core(ispkit_core::Error::DimensionMismatch {
                expected: (grid.width(), grid.height()),
                actual: plane.dimensions(),
            }));
        }

        let plan = AddressPlan::new(grid);
        let width = grid.width() as usize;
        let mut out = vec![0u8; plane.data().len()];

        out.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, dst)| {
                let y = y as u32;
                let src = plane.row(y);
                for (x, (d, &level)) in dst.iter_mut().zip(src).enumerate() {
                    let n = plan.neighborhood(x as u32, y);
                    *d = self.backend.map(&self.cdfs, &n, level);
                }
            });
        log::trace!("{}: {} rows mapped", B::NAME, grid.height());

        Ok(Plane::from_vec(grid.width(), grid.height(), out)?)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Equalize a plane with backend `B`.
///
/// # Arguments
///
/// * `plane` - Input intensities
/// * `options` - Grid configuration
///
/// # Errors
///
/// Returns a configuration error, before any work, if the plane cannot
/// be tiled the way `B` requires.
///
/// # Examples
///
/// ```
/// use ispkit_clahe::{ClaheOptions, Reference, equalize};
/// use ispkit_core::Plane;
///
/// let plane = Plane::from_fn(64, 64, |x, y| ((x + y) * 2) as u8).unwrap();
/// let out = equalize::<Reference>(&plane, &ClaheOptions::default()).unwrap();
/// assert_eq!(out.dimensions(), (64, 64));
/// ```
pub fn equalize<B: Backend>(plane: &Plane, options: &ClaheOptions) -> ClaheResult<Plane> {
    let backend = B::configure(plane.width(), plane.height(), options.block)?;
    let tables = ClaheTables::build(plane, backend)?;
    tables.apply(plane)
}

/// Floating-point CLAHE with `block x block` tiles.
///
/// Sides must be multiples of `2 * block`.
pub fn clahe_reference(plane: &Plane, block: u32) -> ClaheResult<Plane> {
    equalize::<Reference>(plane, &ClaheOptions::default().with_block(block))
}

/// Fixed-point CLAHE on the 8x8 hardware grid.
pub fn clahe_fixed(plane: &Plane) -> ClaheResult<Plane> {
    equalize::<FixedPoint>(plane, &ClaheOptions::default())
}

/// Equalize a color image through its value channel.
///
/// The channel maximum is equalized and each pixel's components are
/// rescaled by `new / old` value, preserving hue and saturation.
///
/// # Errors
///
/// As [`equalize`].
pub fn equalize_rgb<B: Backend>(image: &RgbImage, options: &ClaheOptions) -> ClaheResult<RgbImage> {
    let value = image.value_plane();
    let equalized = equalize::<B>(&value, options)?;
    Ok(image.restore_value(&equalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(width: u32, height: u32) -> Plane {
        Plane::from_fn(width, height, |x, y| ((x * 31 + y * 17) ^ (x * y)) as u8).unwrap()
    }

    #[test]
    fn test_options_default() {
        assert_eq!(ClaheOptions::default().block, 8);
        assert_eq!(ClaheOptions::default().with_block(4).block, 4);
    }

    #[test]
    fn test_uniform_16x16() {
        let plane = Plane::filled(16, 16, 100).unwrap();
        let backend = Reference::configure(16, 16, 8).unwrap();
        let tables = ClaheTables::build(&plane, backend).unwrap();
        let out = tables.apply(&plane).unwrap();

        let expected = (255.0 * tables.cdfs()[0].get(100)) as u8;
        assert!(out.data().iter().all(|&v| v == expected));
        // 2x2 tiles: limit 0 steals everything, bonus 0
        assert_eq!(expected, 0);
    }

    #[test]
    fn test_apply_matches_map_pixel() {
        let plane = textured(64, 64);
        let backend = Reference::configure(64, 64, 4).unwrap();
        let tables = ClaheTables::build(&plane, backend).unwrap();
        let out = tables.apply(&plane).unwrap();
        for (x, y) in [(0, 0), (7, 30), (33, 33), (63, 1), (20, 63)] {
            let level = plane.get(x, y).unwrap();
            assert_eq!(out.get(x, y), Some(tables.map_pixel(x, y, level)));
        }
    }

    #[test]
    fn test_corner_copies_tile_mapping() {
        let plane = textured(64, 64);
        let tables =
            ClaheTables::build(&plane, Reference::configure(64, 64, 4).unwrap()).unwrap();
        let out = tables.apply(&plane).unwrap();
        let level = plane.get(0, 0).unwrap();
        assert_eq!(
            out.get(0, 0),
            Some((255.0 * tables.cdfs()[0].get(level)) as u8)
        );
        let level = plane.get(63, 63).unwrap();
        assert_eq!(
            out.get(63, 63),
            Some((255.0 * tables.cdfs()[15].get(level)) as u8)
        );
    }

    #[test]
    fn test_apply_shape_mismatch() {
        let plane = textured(64, 64);
        let tables =
            ClaheTables::build(&plane, Reference::configure(64, 64, 4).unwrap()).unwrap();
        let other = textured(32, 64);
        assert!(tables.apply(&other).is_err());
    }

    #[test]
    fn test_configuration_errors_before_work() {
        // 5-pixel tiles: odd for the reference, too small for fixed point
        let plane = textured(40, 40);
        assert!(clahe_reference(&plane, 8).unwrap_err().is_configuration());
        assert!(clahe_reference(&plane, 0).unwrap_err().is_configuration());
        assert!(clahe_fixed(&plane).unwrap_err().is_configuration());
    }

    #[test]
    fn test_fixed_corner_formula() {
        let plane = textured(512, 512);
        let tables =
            ClaheTables::build(&plane, FixedPoint::configure(512, 512, 8).unwrap()).unwrap();
        let p = *tables.backend().params();
        let level = plane.get(0, 0).unwrap();
        let c = tables.cdfs()[0].get(level) as u64;
        let fh = p.tile_height() as u64;
        let fw = p.tile_width() as u64;
        let expected = (((fw * (fh * c / 256)) / p.scale()) & 0xff) as u8;
        assert_eq!(tables.map_pixel(0, 0, level), expected);
        assert!(matches!(
            Neighborhood::locate(tables.backend().grid(), 0, 0),
            Neighborhood::Corner { tile: 0 }
        ));
    }

    #[test]
    fn test_equalize_rgb_gray_input() {
        // A gray image equalizes exactly like its value plane
        let plane = textured(64, 64);
        let rgb = RgbImage::from_fn(64, 64, |x, y| {
            let v = plane.get(x, y).unwrap_or(0);
            (v, v, v)
        })
        .unwrap();
        let options = ClaheOptions::default().with_block(4);
        let out = equalize_rgb::<Reference>(&rgb, &options).unwrap();
        let gray = equalize::<Reference>(&plane, &options).unwrap();
        for y in 0..64 {
            for x in 0..64 {
                let (r, g, b) = out.get(x, y).unwrap();
                let v = gray.get(x, y).unwrap();
                if plane.get(x, y) == Some(0) {
                    assert_eq!((r, g, b), (0, 0, 0));
                } else {
                    assert_eq!((r, g, b), (v, v, v));
                }
            }
        }
    }
}
