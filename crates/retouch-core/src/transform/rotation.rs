//! Arbitrary-angle rotation with bicubic interpolation.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each pixel centre in the output
//! image, we calculate where it lands in the source and interpolate a 4x4
//! neighbourhood there with a cubic convolution kernel (a = -0.5).
//!
//! For a clockwise rotation by θ (y axis pointing down) the inverse
//! transform is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `(dx, dy)` is the output pixel centre relative to the output centre.
//!
//! Output pixels whose centre maps outside the source are filled with zero
//! samples: black, or fully transparent black when the image has alpha.

use super::flip::{rotate180, rotate90_ccw, rotate90_cw};
use crate::buffer::PixelBuffer;

/// Angles closer than this to a multiple of 90 degrees use exact permutation.
const ANGLE_EPSILON: f64 = 0.001;

/// Cubic convolution parameter (Keys kernel).
const CUBIC_A: f64 = -0.5;

#[inline]
fn is_near(angle: f64, target: f64) -> bool {
    (angle - target).abs() < ANGLE_EPSILON
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// The result is the smallest integer canvas that contains the whole
/// rotated rectangle.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height) for the rotated bounding box.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if !angle_degrees.is_finite() {
        return (width, height);
    }
    let angle = angle_degrees.rem_euclid(360.0);

    // Fast path: quarter turns either keep or swap the dimensions
    if is_near(angle, 0.0) || is_near(angle, 360.0) || is_near(angle, 180.0) {
        return (width, height);
    }
    if is_near(angle, 90.0) || is_near(angle, 270.0) {
        return (height, width);
    }

    let angle_rad = angle.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    // The small bias keeps exact integers from rounding up on float noise.
    let new_w = (w * cos + h * sin - 1e-9).ceil() as u32;
    let new_h = (w * sin + h * cos - 1e-9).ceil() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image clockwise by an arbitrary angle.
///
/// The image is rotated around its centre and the canvas is expanded to fit
/// the entire rotated image (no clipping). Multiples of 90 degrees are exact
/// permutations with no interpolation.
pub fn rotate(image: &PixelBuffer, angle_degrees: f64) -> PixelBuffer {
    if !angle_degrees.is_finite() {
        log::debug!("rotation angle {} is not finite, image left unchanged", angle_degrees);
        return image.clone();
    }
    let angle = angle_degrees.rem_euclid(360.0);

    if is_near(angle, 0.0) || is_near(angle, 360.0) || image.is_empty() {
        return image.clone();
    }
    if is_near(angle, 90.0) {
        return rotate90_cw(image);
    }
    if is_near(angle, 180.0) {
        return rotate180(image);
    }
    if is_near(angle, 270.0) {
        return rotate90_ccw(image);
    }

    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), angle);

    let angle_rad = angle.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let ch = image.channels();
    let mut output = vec![0u8; dst_w as usize * dst_h as usize * ch];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            if src_x < 0.0 || src_y < 0.0 || src_x >= src_w || src_y >= src_h {
                // Exposed border keeps the zero fill
                continue;
            }

            let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * ch;
            sample_bicubic(image, src_x - 0.5, src_y - 0.5, &mut output[dst_idx..dst_idx + ch]);
        }
    }

    PixelBuffer::from_parts(dst_w, dst_h, image.mode(), output)
}

/// Cubic convolution weight for a tap at distance `x`.
fn cubic_weight(x: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        ((CUBIC_A + 2.0) * x - (CUBIC_A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((CUBIC_A * x - 5.0 * CUBIC_A) * x + 8.0 * CUBIC_A) * x - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

/// Sample all channels at `(x, y)` (pixel-index coordinates) into `out`.
///
/// Taps outside the image are clamped to the nearest edge pixel.
fn sample_bicubic(image: &PixelBuffer, x: f64, y: f64, out: &mut [u8]) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let ch = image.channels();
    let src = image.samples();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let wx = [cubic_weight(fx + 1.0), cubic_weight(fx), cubic_weight(fx - 1.0), cubic_weight(fx - 2.0)];
    let wy = [cubic_weight(fy + 1.0), cubic_weight(fy), cubic_weight(fy - 1.0), cubic_weight(fy - 2.0)];

    let mut sum = [0.0f64; 4];
    for (j, wyj) in wy.iter().enumerate() {
        let py = (y0 - 1 + j as i64).clamp(0, h - 1) as usize;
        for (i, wxi) in wx.iter().enumerate() {
            let px = (x0 - 1 + i as i64).clamp(0, w - 1) as usize;
            let idx = (py * w as usize + px) * ch;
            let weight = wxi * wyj;
            for c in 0..ch {
                sum[c] += src[idx + c] as f64 * weight;
            }
        }
    }

    for c in 0..ch {
        out[c] = sum[c].clamp(0.0, 255.0).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ColorMode;

    /// Create a simple test image with a gradient pattern.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, ColorMode::Rgb, |x, y, px| {
            let v = ((x + y) * 8) as u8;
            px.copy_from_slice(&[v, v, v]);
        })
    }

    #[test]
    fn test_no_rotation() {
        let img = test_image(100, 50);
        let result = rotate(&img, 0.0);
        assert_eq!(result, img);
    }

    #[test]
    fn test_tiny_rotation_fast_path() {
        let img = test_image(100, 50);
        let result = rotate(&img, 0.0001);
        assert_eq!(result, img);
    }

    #[test]
    fn test_full_rotation() {
        let img = test_image(50, 50);
        assert_eq!(rotate(&img, 360.0), img);
        assert_eq!(rotate(&img, -720.0), img);
    }

    #[test]
    fn test_non_finite_angle_keeps_image() {
        let img = PixelBuffer::filled(40, 30, ColorMode::Rgb, 200);
        for angle in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(rotate(&img, angle), img);
            assert_eq!(compute_rotated_bounds(40, 30, angle), (40, 30));
        }
    }

    #[test]
    fn test_quarter_turns_are_exact() {
        let img = test_image(20, 10);
        assert_eq!(rotate(&img, 90.0), rotate90_cw(&img));
        assert_eq!(rotate(&img, 180.0), rotate180(&img));
        assert_eq!(rotate(&img, 270.0), rotate90_ccw(&img));
        assert_eq!(rotate(&img, -90.0), rotate90_ccw(&img));
    }

    #[test]
    fn test_90_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
    }

    #[test]
    fn test_180_degree_rotation_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4, rounded up to contain it
        assert_eq!(w, 142);
        assert_eq!(h, 142);
    }

    #[test]
    fn test_negative_rotation_bounds() {
        // Negative and positive rotations should give same bounds
        assert_eq!(compute_rotated_bounds(100, 50, 30.0), compute_rotated_bounds(100, 50, -30.0));
    }

    #[test]
    fn test_rotation_expands_canvas() {
        let img = test_image(100, 100);
        let result = rotate(&img, 45.0);
        assert_eq!(result.dimensions(), (142, 142));
        assert_eq!(result.mode(), ColorMode::Rgb);
    }

    #[test]
    fn test_exposed_corners_are_black() {
        let img = PixelBuffer::filled(20, 20, ColorMode::Rgb, 255);
        let result = rotate(&img, 45.0);
        assert_eq!(result.pixel(0, 0), &[0, 0, 0]);
        let (w, h) = result.dimensions();
        assert_eq!(result.pixel(w / 2, h / 2), &[255, 255, 255]);
    }

    #[test]
    fn test_exposed_corners_transparent_with_alpha() {
        let img = PixelBuffer::filled(20, 20, ColorMode::Rgba, 255);
        let result = rotate(&img, 30.0);
        assert_eq!(result.pixel(0, 0), &[0, 0, 0, 0]);
        let (w, h) = result.dimensions();
        assert_eq!(result.pixel(w / 2, h / 2), &[255, 255, 255, 255]);
    }

    #[test]
    fn test_positive_angle_is_clockwise() {
        // Horizontal bar from the centre to the right edge, rows 9..=11
        let img = PixelBuffer::from_fn(21, 21, ColorMode::Luminance, |x, y, px| {
            px[0] = if (9..=11).contains(&y) && x >= 11 { 255 } else { 0 };
        });
        let result = rotate(&img, 30.0);
        assert_eq!(result.dimensions(), (29, 29));

        // Clockwise on screen: the bar now points down and to the right
        assert!(result.pixel(20, 17)[0] > 128, "below-right should be bright");
        assert!(result.pixel(20, 11)[0] < 64, "above-right should stay dark");
    }

    #[test]
    fn test_small_image_rotation() {
        let img = test_image(4, 4);
        let result = rotate(&img, 30.0);
        assert!(result.width() > 0);
        assert!(result.height() > 0);
        assert_eq!(result.byte_size(), result.pixel_count() * 3);
    }

    #[test]
    fn test_cubic_weight_properties() {
        assert!((cubic_weight(0.0) - 1.0).abs() < f64::EPSILON);
        assert!(cubic_weight(1.0).abs() < 1e-12);
        assert!(cubic_weight(2.0).abs() < 1e-12);
        assert!((cubic_weight(0.7) - cubic_weight(-0.7)).abs() < 1e-12);

        // Taps sum to one for any fractional offset
        for f in [0.0, 0.25, 0.5, 0.9] {
            let s = cubic_weight(f + 1.0) + cubic_weight(f) + cubic_weight(f - 1.0) + cubic_weight(f - 2.0);
            assert!((s - 1.0).abs() < 1e-12, "sum {} at {}", s, f);
        }
    }
}
