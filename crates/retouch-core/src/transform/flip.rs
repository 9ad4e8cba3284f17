//! Lossless pixel permutations.
//!
//! None of these interpolate or fill: every output pixel is a copy of
//! exactly one input pixel.

use crate::buffer::PixelBuffer;

/// Build a `out_w` x `out_h` image where output `(x, y)` copies the input
/// pixel returned by `source(x, y)`.
fn permute<F>(image: &PixelBuffer, out_w: u32, out_h: u32, source: F) -> PixelBuffer
where
    F: Fn(u32, u32) -> (u32, u32),
{
    let ch = image.channels();
    let src = image.samples();
    let src_w = image.width() as usize;
    let mut output = vec![0u8; out_w as usize * out_h as usize * ch];

    for y in 0..out_h {
        for x in 0..out_w {
            let (sx, sy) = source(x, y);
            let src_idx = (sy as usize * src_w + sx as usize) * ch;
            let dst_idx = (y as usize * out_w as usize + x as usize) * ch;
            output[dst_idx..dst_idx + ch].copy_from_slice(&src[src_idx..src_idx + ch]);
        }
    }

    PixelBuffer::from_parts(out_w, out_h, image.mode(), output)
}

/// Mirror left-right.
pub fn flip_horizontal(image: &PixelBuffer) -> PixelBuffer {
    let (w, h) = image.dimensions();
    permute(image, w, h, |x, y| (w - 1 - x, y))
}

/// Mirror top-bottom.
pub fn flip_vertical(image: &PixelBuffer) -> PixelBuffer {
    let (w, h) = image.dimensions();
    permute(image, w, h, |x, y| (x, h - 1 - y))
}

/// Rotate 90 degrees clockwise. Width and height swap.
pub fn rotate90_cw(image: &PixelBuffer) -> PixelBuffer {
    let (w, h) = image.dimensions();
    permute(image, h, w, |x, y| (y, h - 1 - x))
}

/// Rotate 90 degrees counter-clockwise. Width and height swap.
pub fn rotate90_ccw(image: &PixelBuffer) -> PixelBuffer {
    let (w, h) = image.dimensions();
    permute(image, h, w, |x, y| (w - 1 - y, x))
}

/// Rotate 180 degrees.
pub fn rotate180(image: &PixelBuffer) -> PixelBuffer {
    let (w, h) = image.dimensions();
    permute(image, w, h, |x, y| (w - 1 - x, h - 1 - y))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::ColorMode;
    use proptest::prelude::*;

    /// Strategy for small images with arbitrary content in any mode.
    fn image_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=12, 1u32..=12, 0usize..3).prop_flat_map(|(w, h, m)| {
            let mode = [ColorMode::Luminance, ColorMode::Rgb, ColorMode::Rgba][m];
            let len = (w * h) as usize * mode.channels();
            proptest::collection::vec(any::<u8>(), len)
                .prop_map(move |data| PixelBuffer::new(w, h, mode, data).unwrap())
        })
    }

    proptest! {
        /// Property: flipping twice restores the image.
        #[test]
        fn prop_flips_are_involutions(img in image_strategy()) {
            prop_assert_eq!(flip_horizontal(&flip_horizontal(&img)), img.clone());
            prop_assert_eq!(flip_vertical(&flip_vertical(&img)), img);
        }

        /// Property: clockwise undoes counter-clockwise.
        #[test]
        fn prop_quarter_turns_invert(img in image_strategy()) {
            prop_assert_eq!(rotate90_cw(&rotate90_ccw(&img)), img.clone());
            prop_assert_eq!(rotate90_ccw(&rotate90_cw(&img)), img);
        }

        /// Property: two quarter turns equal a half turn.
        #[test]
        fn prop_half_turn(img in image_strategy()) {
            prop_assert_eq!(rotate90_cw(&rotate90_cw(&img)), rotate180(&img));
        }
    }
}
