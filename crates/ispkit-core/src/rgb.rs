//! Interleaved 8-bit RGB images and the value-channel bridge
//!
//! The equalizer works on one intensity plane. Color frames are reduced
//! to their HSV value channel (the per-pixel maximum of R, G and B),
//! equalized, and then rebuilt by scaling every channel with the ratio
//! between the new and the old value. Hue and saturation are preserved
//! up to integer truncation.

use crate::error::{Error, Result};
use crate::plane::Plane;

/// Interleaved RGB image, 3 bytes per pixel in R, G, B order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbImage {
    /// Create a black RGB image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        })
    }

    /// Wrap an interleaved RGB buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height * 3`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::BufferSize {
                width,
                height,
                channels: 3,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y) -> (r, g, b)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> (u8, u8, u8),
    {
        let mut img = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = f(x, y);
                let idx = img.index(x, y);
                img.data[idx..idx + 3].copy_from_slice(&[r, g, b]);
            }
        }
        Ok(img)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the interleaved pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the `(r, g, b)` triple at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some((self.data[idx], self.data[idx + 1], self.data[idx + 2]))
    }

    /// Set the `(r, g, b)` triple at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(x, y);
        self.data[idx..idx + 3].copy_from_slice(&[rgb.0, rgb.1, rgb.2]);
        Ok(())
    }

    /// Replicate a gray plane into all three channels.
    pub fn from_gray(plane: &Plane) -> Self {
        RgbImage {
            width: plane.width(),
            height: plane.height(),
            data: plane.data().iter().flat_map(|&v| [v, v, v]).collect(),
        }
    }

    /// Reduce to the HSV value channel: `max(r, g, b)` per pixel.
    pub fn value_plane(&self) -> Plane {
        let data: Vec<u8> = self
            .data
            .chunks_exact(3)
            .map(|px| px[0].max(px[1]).max(px[2]))
            .collect();
        Plane::from_raw(self.width, self.height, data)
    }

    /// Rebuild color from an equalized value plane.
    ///
    /// Each channel becomes `c * v_new / max(r, g, b)` (truncating),
    /// with a zero maximum treated as 1 so black pixels stay black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `value` differs in shape.
    pub fn restore_value(&self, value: &Plane) -> Result<RgbImage> {
        if value.dimensions() != self.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: value.dimensions(),
            });
        }

        let mut data = Vec::with_capacity(self.data.len());
        for (px, &v) in self.data.chunks_exact(3).zip(value.data()) {
            let m = px[0].max(px[1]).max(px[2]).max(1) as u32;
            for &c in px {
                let scaled = c as u32 * v as u32 / m;
                data.push(scaled.min(255) as u8);
            }
        }
        Ok(RgbImage {
            width: self.width,
            height: self.height,
            data,
        })
    }
}
