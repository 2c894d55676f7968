//! Image formats and decoded images
//!
//! Detects formats by magic number or file extension.

use crate::{IoError, IoResult};
use ispkit_core::{Plane, RgbImage};
use std::path::Path;

/// PNG: 89 50 4E 47 0D 0A 1A 0A
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// On-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// One hex value per line, as used by RTL testbenches
    Hex,
}

impl ImageFormat {
    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Hex => "txt",
        }
    }

    /// Guess a format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ImageFormat::Png),
            "txt" | "hex" => Ok(ImageFormat::Hex),
            _ => Err(IoError::UnsupportedFormat(format!(
                "unknown extension: {:?}",
                ext
            ))),
        }
    }
}

/// Detect a format from the first bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        return Ok(ImageFormat::Png);
    }
    let first_line = data
        .split(|&b| b == b'\n')
        .next()
        .unwrap_or_default()
        .trim_ascii();
    if !first_line.is_empty() && first_line.iter().all(u8::is_ascii_hexdigit) {
        return Ok(ImageFormat::Hex);
    }
    Err(IoError::UnsupportedFormat(
        "unrecognized file header".to_string(),
    ))
}

/// A decoded image, gray or color
#[derive(Debug, Clone)]
pub enum Image {
    Gray(Plane),
    Rgb(RgbImage),
}

impl Image {
    /// Image dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Image::Gray(p) => p.dimensions(),
            Image::Rgb(c) => c.dimensions(),
        }
    }

    /// Intensity plane: the image itself if gray, else its value channel.
    pub fn into_plane(self) -> Plane {
        match self {
            Image::Gray(p) => p,
            Image::Rgb(c) => c.value_plane(),
        }
    }

    /// Color image, replicating gray into all three channels.
    pub fn into_rgb(self) -> RgbImage {
        match self {
            Image::Rgb(c) => c,
            Image::Gray(p) => RgbImage::from_gray(&p),
        }
    }
}
