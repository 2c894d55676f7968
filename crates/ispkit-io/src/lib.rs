//! ispkit-io - Image and simulation-dump I/O
//!
//! - PNG read/write for viewing and archiving frames (`png-format` feature)
//! - Hex text dumps exchanged with RTL testbenches ([`hex`])
//! - Per-tile CDF traces for comparing histogram-stage memories ([`trace`])

pub mod error;
pub mod format;
pub mod hex;
#[cfg(feature = "png-format")]
pub mod png;
pub mod trace;

pub use error::{IoError, IoResult};
pub use format::{Image, ImageFormat, detect_format_from_bytes};
pub use hex::{DEFAULT_PAD_GRAY, HexOptions, read_hex_gray, read_hex_rgb, write_hex_gray, write_hex_rgb};
pub use trace::{CdfTable, first_trace_mismatch, read_cdf_trace, write_cdf_trace};

use ispkit_core::{Plane, RgbImage};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// Read a self-describing image file (PNG).
///
/// # Errors
///
/// Hex dumps carry no dimensions; reading one here returns
/// [`IoError::UnsupportedFormat`]. Use [`read_hex_gray_file`] or
/// [`read_hex_rgb_file`] instead.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let mut header = [0u8; 16];
    let n = File::open(path)?.read(&mut header)?;
    let format = detect_format_from_bytes(&header[..n])?;
    log::debug!("reading {} as {:?}", path.display(), format);

    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(BufReader::new(File::open(path)?)),
        #[cfg(not(feature = "png-format"))]
        ImageFormat::Png => Err(IoError::UnsupportedFormat(
            "PNG support not enabled".to_string(),
        )),
        ImageFormat::Hex => Err(IoError::UnsupportedFormat(
            "hex dumps need explicit dimensions".to_string(),
        )),
    }
}

/// Write an image in `format`.
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    log::debug!("writing {} as {:?}", path.display(), format);
    let writer = BufWriter::new(File::create(path)?);

    match (format, image) {
        #[cfg(feature = "png-format")]
        (ImageFormat::Png, Image::Gray(p)) => png::write_png_gray(p, writer),
        #[cfg(feature = "png-format")]
        (ImageFormat::Png, Image::Rgb(c)) => png::write_png_rgb(c, writer),
        #[cfg(not(feature = "png-format"))]
        (ImageFormat::Png, _) => Err(IoError::UnsupportedFormat(
            "PNG support not enabled".to_string(),
        )),
        (ImageFormat::Hex, Image::Gray(p)) => write_hex_gray(p, writer, &HexOptions::default()),
        (ImageFormat::Hex, Image::Rgb(c)) => write_hex_rgb(c, writer),
    }
}

/// Write a plane in `format`.
pub fn write_plane<P: AsRef<Path>>(plane: &Plane, path: P, format: ImageFormat) -> IoResult<()> {
    write_image(&Image::Gray(plane.clone()), path, format)
}

/// Read a plane from a PNG file, reducing color to its value channel.
pub fn read_plane<P: AsRef<Path>>(path: P) -> IoResult<Plane> {
    read_image(path).map(Image::into_plane)
}

/// Read a gray hex dump file.
pub fn read_hex_gray_file<P: AsRef<Path>>(path: P, width: u32, height: u32) -> IoResult<Plane> {
    let path = path.as_ref();
    log::debug!("reading {}x{} gray dump {}", width, height, path.display());
    read_hex_gray(BufReader::new(File::open(path)?), width, height)
}

/// Read an RGB hex dump file.
pub fn read_hex_rgb_file<P: AsRef<Path>>(path: P, width: u32, height: u32) -> IoResult<RgbImage> {
    let path = path.as_ref();
    log::debug!("reading {}x{} RGB dump {}", width, height, path.display());
    read_hex_rgb(BufReader::new(File::open(path)?), width, height)
}

/// Write a gray hex dump file.
pub fn write_hex_gray_file<P: AsRef<Path>>(plane: &Plane, path: P, options: &HexOptions) -> IoResult<()> {
    let path = path.as_ref();
    log::debug!("writing gray dump {}", path.display());
    write_hex_gray(plane, BufWriter::new(File::create(path)?), options)
}

/// Write an RGB hex dump file.
pub fn write_hex_rgb_file<P: AsRef<Path>>(image: &RgbImage, path: P) -> IoResult<()> {
    let path = path.as_ref();
    log::debug!("writing RGB dump {}", path.display());
    write_hex_rgb(image, BufWriter::new(File::create(path)?))
}
