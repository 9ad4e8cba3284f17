//! Median filter.

use super::kernel::force_odd;
use super::reflect_101;
use crate::buffer::{PixelBuffer, ProcessMode};

/// Replace every sample by the median of its `size x size` neighbourhood.
///
/// `size` is forced odd. Works per colour channel in [`ProcessMode::Rgb`]
/// and on luminance in [`ProcessMode::Luminance`]; alpha passes through.
pub fn median_filter(image: &PixelBuffer, size: usize, mode: ProcessMode) -> PixelBuffer {
    let size = force_odd(size);
    if size == 1 {
        return image.clone();
    }
    image.map_planes(mode, |plane, w, h| median_plane(plane, w, h, size))
}

fn median_plane(src: &[u8], width: usize, height: usize, size: usize) -> Vec<u8> {
    let radius = (size / 2) as i64;
    let mid = size * size / 2;
    let mut window = vec![0u8; size * size];
    let mut dst = Vec::with_capacity(src.len());

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut count = 0;
            for dy in -radius..=radius {
                let sy = reflect_101(y + dy, height);
                for dx in -radius..=radius {
                    let sx = reflect_101(x + dx, width);
                    window[count] = src[sy * width + sx];
                    count += 1;
                }
            }
            let (_, median, _) = window.select_nth_unstable(mid);
            dst.push(*median);
        }
    }
    dst
}
