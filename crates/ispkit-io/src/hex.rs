//! Hex text format for RTL simulation
//!
//! Testbenches load and dump frames as plain text, one pixel per line in
//! row-major order:
//!
//! - gray: the value in lowercase hex without padding (`0`, `a`, `ff`)
//! - RGB: six digits, `RRGGBB`
//!
//! Readers accept either one or two digits for gray values and ignore
//! blank lines, so dumps with a trailing newline or padded gray values
//! load the same way.

use crate::{IoError, IoResult};
use ispkit_core::{Plane, RgbImage};
use std::io::{BufRead, Write};

/// Default for zero-padding gray values to two digits
pub const DEFAULT_PAD_GRAY: bool = false;

/// Options for writing hex dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexOptions {
    /// Write gray values as exactly two digits
    pub pad_gray: bool,
}

impl Default for HexOptions {
    fn default() -> Self {
        Self {
            pad_gray: DEFAULT_PAD_GRAY,
        }
    }
}

/// Write a plane as one hex value per line.
pub fn write_hex_gray<W: Write>(plane: &Plane, mut writer: W, options: &HexOptions) -> IoResult<()> {
    for &v in plane.data() {
        if options.pad_gray {
            writeln!(writer, "{:02x}", v)?;
        } else {
            writeln!(writer, "{:x}", v)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write an RGB image as one `RRGGBB` line per pixel.
pub fn write_hex_rgb<W: Write>(image: &RgbImage, mut writer: W) -> IoResult<()> {
    for px in image.data().chunks_exact(3) {
        writeln!(writer, "{:02x}{:02x}{:02x}", px[0], px[1], px[2])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a `width x height` plane from a gray hex dump.
///
/// # Errors
///
/// Returns [`IoError::HexParse`] for a malformed line and
/// [`IoError::EntryCount`] if the dump does not hold exactly
/// `width * height` values.
pub fn read_hex_gray<R: BufRead>(reader: R, width: u32, height: u32) -> IoResult<Plane> {
    let expected = width as usize * height as usize;
    let mut data = Vec::with_capacity(expected);
    for_each_entry(reader, |line, text| {
        if text.len() > 2 || !is_hex(text) {
            return Err(parse_error(line, text));
        }
        let v = u8::from_str_radix(text, 16).map_err(|_| parse_error(line, text))?;
        data.push(v);
        Ok(())
    })?;
    check_count(expected, data.len())?;
    Ok(Plane::from_vec(width, height, data)?)
}

/// Read a `width x height` RGB image from an `RRGGBB` hex dump.
///
/// # Errors
///
/// As [`read_hex_gray`].
pub fn read_hex_rgb<R: BufRead>(reader: R, width: u32, height: u32) -> IoResult<RgbImage> {
    let expected = width as usize * height as usize;
    let mut data = Vec::with_capacity(expected * 3);
    for_each_entry(reader, |line, text| {
        if text.len() != 6 || !is_hex(text) {
            return Err(parse_error(line, text));
        }
        let v = u32::from_str_radix(text, 16).map_err(|_| parse_error(line, text))?;
        data.extend_from_slice(&[(v >> 16) as u8, (v >> 8) as u8, v as u8]);
        Ok(())
    })?;
    check_count(expected, data.len() / 3)?;
    Ok(RgbImage::from_vec(width, height, data)?)
}

/// Call `f(line_number, trimmed_text)` for every non-blank line.
pub(crate) fn for_each_entry<R, F>(reader: R, mut f: F) -> IoResult<()>
where
    R: BufRead,
    F: FnMut(usize, &str) -> IoResult<()>,
{
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        f(i + 1, text)?;
    }
    Ok(())
}

pub(crate) fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())
}

pub(crate) fn parse_error(line: usize, text: &str) -> IoError {
    IoError::HexParse {
        line,
        text: text.to_string(),
    }
}

pub(crate) fn check_count(expected: usize, actual: usize) -> IoResult<()> {
    if expected != actual {
        return Err(IoError::EntryCount { expected, actual });
    }
    Ok(())
}
