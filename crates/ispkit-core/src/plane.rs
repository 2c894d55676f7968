//! Plane - the single-channel 8-bit image container
//!
//! `Plane` holds one dense row-major array of `u8` intensities. It is
//! the buffer type exchanged between pipeline stages: the equalizer
//! consumes a luma/value plane and produces another of the same shape.
//!
//! # Ownership model
//!
//! `Plane` uses `Arc` for cheap cloning (shared ownership, read-only).
//! To modify pixel data, convert to `PlaneMut` via [`Plane::try_into_mut`]
//! or [`Plane::to_mut`], then convert back with `Into<Plane>`.

use crate::error::{Error, Result};
use std::sync::Arc;

/// Internal plane data
#[derive(Debug)]
struct PlaneData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Row-major pixel values, `width * height` bytes
    data: Vec<u8>,
}

impl PlaneData {
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Single-channel 8-bit image
///
/// # Examples
///
/// ```
/// use ispkit_core::Plane;
///
/// let plane = Plane::new(640, 480).unwrap();
/// assert_eq!(plane.width(), 640);
/// assert_eq!(plane.height(), 480);
/// assert_eq!(plane.get(10, 10), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct Plane {
    inner: Arc<PlaneData>,
}

impl Plane {
    /// Create a new plane initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, 0)
    }

    /// Create a new plane with every pixel set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let data = vec![value; width as usize * height as usize];
        Ok(Plane {
            inner: Arc::new(PlaneData {
                width,
                height,
                data,
            }),
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or
    /// [`Error::BufferSize`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferSize {
                width,
                height,
                channels: 1,
                expected,
                actual: data.len(),
            });
        }
        Ok(Plane {
            inner: Arc::new(PlaneData {
                width,
                height,
                data,
            }),
        })
    }

    /// Wrap a buffer whose shape the caller has already validated.
    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Plane {
            inner: Arc::new(PlaneData {
                width,
                height,
                data,
            }),
        }
    }

    /// Build a plane by evaluating `f(x, y)` for every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u8,
    {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::from_vec(width, height, data)
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get raw access to the row-major pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get one row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[self.inner.index(x, y)])
    }

    /// Get a pixel value without bounds checking against the width.
    ///
    /// # Panics
    ///
    /// Panics if the linear index falls outside the buffer.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> u8 {
        self.inner.data[self.inner.index(x, y)]
    }

    /// Check whether two planes have the same dimensions.
    pub fn sizes_equal(&self, other: &Plane) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Get the number of strong references to this plane.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Create a deep copy of this plane.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Plane {
            inner: Arc::new(PlaneData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PlaneMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PlaneMut { inner: data }),
            Err(arc) => Err(Plane { inner: arc }),
        }
    }

    /// Create a mutable copy of this plane.
    pub fn to_mut(&self) -> PlaneMut {
        PlaneMut {
            inner: PlaneData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            },
        }
    }

    /// Consume the plane and return its pixel buffer.
    ///
    /// Copies only when the data is shared.
    pub fn into_vec(self) -> Vec<u8> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => data.data,
            Err(arc) => arc.data.clone(),
        }
    }
}

/// Mutable plane
///
/// Allows modification of pixel data. Convert back to an immutable
/// [`Plane`] using `Into<Plane>`.
#[derive(Debug)]
pub struct PlaneMut {
    inner: PlaneData,
}

impl PlaneMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get raw access to the pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable raw access to the pixel data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get one mutable row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &mut self.inner.data[start..start + w]
    }

    /// Get a pixel value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.inner.data[self.inner.index(x, y)])
    }

    /// Set a pixel value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.inner.width,
                height: self.inner.height,
            });
        }
        let idx = self.inner.index(x, y);
        self.inner.data[idx] = value;
        Ok(())
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u8) {
        self.inner.data.fill(value);
    }
}

impl From<PlaneMut> for Plane {
    fn from(plane_mut: PlaneMut) -> Self {
        Plane {
            inner: Arc::new(plane_mut.inner),
        }
    }
}
