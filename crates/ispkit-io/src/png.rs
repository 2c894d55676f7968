//! PNG image format support

use crate::format::Image;
use crate::{IoError, IoResult};
use ispkit_core::{Plane, RgbImage};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Palette and low-bit-depth images are expanded and 16-bit samples are
/// stripped to 8 bits. Alpha is discarded.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG format: {:?} {:?}",
            color_type, bit_depth
        )));
    }
    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "unexpanded PNG palette".to_string(),
            ));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let row_len = width as usize * samples;
    let rows = buf[..output_info.buffer_size()]
        .chunks(bytes_per_row)
        .take(height as usize)
        .map(|row| &row[..row_len]);

    let image = match color_type {
        ColorType::Grayscale => {
            let mut data = Vec::with_capacity(width as usize * height as usize);
            for row in rows {
                data.extend_from_slice(row);
            }
            Image::Gray(Plane::from_vec(width, height, data)?)
        }
        ColorType::GrayscaleAlpha => {
            let mut data = Vec::with_capacity(width as usize * height as usize);
            for row in rows {
                data.extend(row.chunks_exact(2).map(|px| px[0]));
            }
            Image::Gray(Plane::from_vec(width, height, data)?)
        }
        _ => {
            let mut data = Vec::with_capacity(width as usize * height as usize * 3);
            for row in rows {
                for px in row.chunks_exact(samples) {
                    data.extend_from_slice(&px[..3]);
                }
            }
            Image::Rgb(RgbImage::from_vec(width, height, data)?)
        }
    };
    Ok(image)
}

/// Write a plane as an 8-bit grayscale PNG
pub fn write_png_gray<W: Write>(plane: &Plane, writer: W) -> IoResult<()> {
    write_png_data(
        writer,
        plane.width(),
        plane.height(),
        ColorType::Grayscale,
        plane.data(),
    )
}

/// Write an RGB image as an 8-bit RGB PNG
pub fn write_png_rgb<W: Write>(image: &RgbImage, writer: W) -> IoResult<()> {
    write_png_data(
        writer,
        image.width(),
        image.height(),
        ColorType::Rgb,
        image.data(),
    )
}

fn write_png_data<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    color_type: ColorType,
    data: &[u8],
) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip_grayscale() {
        let plane = Plane::from_fn(10, 10, |x, y| ((x + y) * 10) as u8).unwrap();

        let mut buffer = Vec::new();
        write_png_gray(&plane, &mut buffer).unwrap();

        match read_png(Cursor::new(buffer)).unwrap() {
            Image::Gray(read) => {
                assert_eq!(read.dimensions(), (10, 10));
                assert_eq!(read.data(), plane.data());
            }
            Image::Rgb(_) => panic!("expected a gray image"),
        }
    }

    #[test]
    fn test_png_roundtrip_rgb() {
        let mut image = RgbImage::new(5, 5).unwrap();
        image.set(0, 0, (255, 0, 0)).unwrap();
        image.set(1, 1, (0, 255, 0)).unwrap();
        image.set(2, 2, (0, 0, 255)).unwrap();

        let mut buffer = Vec::new();
        write_png_rgb(&image, &mut buffer).unwrap();

        match read_png(Cursor::new(buffer)).unwrap() {
            Image::Rgb(read) => assert_eq!(read, image),
            Image::Gray(_) => panic!("expected an RGB image"),
        }
    }

    #[test]
    fn test_png_rgba_drops_alpha() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 2, 1);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer
                .write_image_data(&[10, 20, 30, 0, 40, 50, 60, 255])
                .unwrap();
        }
        let image = read_png(Cursor::new(buffer)).unwrap().into_rgb();
        assert_eq!(image.data(), &[10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_png_garbage() {
        assert!(read_png(Cursor::new(vec![0u8; 16])).is_err());
    }
}
