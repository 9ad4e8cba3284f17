//! Histogram computation from pixel buffers.
//!
//! Luminance images produce a single luminance table. Colour images are
//! binned per channel after conversion to RGB, so alpha never contributes.

use crate::buffer::{ColorMode, PixelBuffer};
use crate::HistogramTable;

/// Compute the 256-bucket histogram table of an image.
///
/// # Example
/// ```
/// use retouch_core::buffer::{ColorMode, PixelBuffer};
/// use retouch_core::histogram::compute_histogram;
///
/// let img = PixelBuffer::new(2, 1, ColorMode::Rgb, vec![255, 0, 0, 0, 255, 0]).unwrap();
/// let hist = compute_histogram(&img);
/// assert_eq!(hist.channels()[0].1[255], 1);
/// ```
///
/// # Performance
/// Single pass over the samples; memory is constant (1-3 KB for bins).
pub fn compute_histogram(image: &PixelBuffer) -> HistogramTable {
    if image.mode() == ColorMode::Luminance {
        let mut luminance = [0u32; 256];
        for &v in image.samples() {
            luminance[v as usize] += 1;
        }
        return HistogramTable::Luminance { luminance };
    }

    let rgb = image.convert(ColorMode::Rgb);
    let mut red = [0u32; 256];
    let mut green = [0u32; 256];
    let mut blue = [0u32; 256];
    for px in rgb.samples().chunks_exact(3) {
        red[px[0] as usize] += 1;
        green[px[1] as usize] += 1;
        blue[px[2] as usize] += 1;
    }
    HistogramTable::Rgb { red, green, blue }
}

/// Map a histogram with any number of levels onto 256 buckets.
///
/// Level `i` of `n` lands in bucket `i * 256 / n`. Several levels share a
/// bucket when `n > 256`; when `n < 256` the buckets in between stay empty.
/// The total count is preserved.
pub fn rebin(levels: &[u32]) -> [u32; 256] {
    let mut out = [0u32; 256];
    let n = levels.len() as u64;
    for (i, &count) in levels.iter().enumerate() {
        let bucket = (i as u64 * 256 / n) as usize;
        out[bucket] += count;
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mode_strategy() -> impl Strategy<Value = ColorMode> {
        prop_oneof![Just(ColorMode::Luminance), Just(ColorMode::Rgb), Just(ColorMode::Rgba)]
    }

    proptest! {
        /// Property: every channel sums to the pixel count.
        #[test]
        fn prop_channel_sums_equal_pixel_count(
            w in 1u32..12,
            h in 1u32..12,
            mode in mode_strategy(),
            seed in any::<u8>(),
        ) {
            let img = PixelBuffer::from_fn(w, h, mode, |x, y, px| {
                for (c, v) in px.iter_mut().enumerate() {
                    *v = seed.wrapping_add((x * 31 + y * 17 + c as u32 * 7) as u8);
                }
            });
            let hist = compute_histogram(&img);
            for (_, bins) in hist.channels() {
                prop_assert_eq!(bins.iter().map(|&c| c as u64).sum::<u64>(), (w * h) as u64);
            }
            prop_assert_eq!(hist.total(), (w * h) as u64);
        }

        /// Property: rebinning preserves the total count.
        #[test]
        fn prop_rebin_preserves_total(levels in prop::collection::vec(0u32..1000, 1..1024)) {
            let total: u64 = levels.iter().map(|&c| c as u64).sum();
            let out = rebin(&levels);
            prop_assert_eq!(out.iter().map(|&c| c as u64).sum::<u64>(), total);
        }
    }
}
