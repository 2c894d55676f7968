//! Synthetic test images
//!
//! Deterministic generators standing in for camera frames. Each returns a
//! plane whose histogram properties are known in advance.

use ispkit_core::{Plane, RgbImage};

/// Every pixel set to `value`.
pub fn constant(width: u32, height: u32, value: u8) -> Plane {
    plane(width, height, |_, _| value)
}

/// Diagonal ramp `(x / 2 + y / 3) mod 256`.
///
/// A 256x256 tile holds at most 512 pixels of any one level, below the
/// clip limit of either variant, so tiles of that size are never clipped.
pub fn diagonal_ramp(width: u32, height: u32) -> Plane {
    plane(width, height, |x, y| ((x / 2 + y / 3) % 256) as u8)
}

/// Busy texture with a broad histogram.
pub fn texture(width: u32, height: u32) -> Plane {
    plane(width, height, |x, y| {
        let h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
        (h ^ (h >> 11) ^ (h >> 19)) as u8
    })
}

/// Low-contrast frame: levels confined to `[base, base + span)`.
pub fn dim(width: u32, height: u32, base: u8, span: u8) -> Plane {
    let span = span.max(1) as u32;
    plane(width, height, |x, y| base.saturating_add(((x * 7 + y * 13) % span) as u8))
}

/// Two halves with unrelated content, meeting at `x = width / 2`.
///
/// The left half is bright (`200..250`), the right half dark (`0..100`).
pub fn split(width: u32, height: u32) -> Plane {
    let mid = width / 2;
    plane(width, height, |x, y| {
        if x < mid {
            200 + ((x * 3 + y * 5) % 50) as u8
        } else {
            ((y * 16 + x) % 100) as u8
        }
    })
}

/// Color frame whose value channel is [`texture`].
pub fn color_texture(width: u32, height: u32) -> RgbImage {
    let v = texture(width, height);
    let mut data = Vec::with_capacity(v.data().len() * 3);
    for (i, &m) in v.data().iter().enumerate() {
        let i = i as u32;
        // Max channel rotates between R, G and B
        let a = (m as u32 * 3 / 4) as u8;
        let b = (m as u32 / 3) as u8;
        match i % 3 {
            0 => data.extend_from_slice(&[m, a, b]),
            1 => data.extend_from_slice(&[b, m, a]),
            _ => data.extend_from_slice(&[a, b, m]),
        }
    }
    match RgbImage::from_vec(width, height, data) {
        Ok(img) => img,
        Err(e) => panic!("synthetic image {}x{}: {}", width, height, e),
    }
}

fn plane<F: FnMut(u32, u32) -> u8>(width: u32, height: u32, f: F) -> Plane {
    match Plane::from_fn(width, height, f) {
        Ok(p) => p,
        Err(e) => panic!("synthetic image {}x{}: {}", width, height, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(constant(8, 4, 9).dimensions(), (8, 4));
        assert!(constant(8, 4, 9).data().iter().all(|&v| v == 9));
        assert_eq!(split(16, 2).get(7, 0), Some(200 + 21 % 50));
        assert!(split(16, 2).get(8, 1).is_some_and(|v| v < 100));
    }

    #[test]
    fn test_dim_range() {
        let p = dim(32, 32, 100, 20);
        assert!(p.data().iter().all(|&v| (100..120).contains(&v)));
    }

    #[test]
    fn test_color_texture_value() {
        let c = color_texture(16, 16);
        assert_eq!(c.value_plane().data(), texture(16, 16).data());
    }
}
