//! Generic 2-D correlation.

use super::kernel::Kernel;
use super::reflect_101;
use crate::buffer::{PixelBuffer, ProcessMode};
use crate::{Applied, Correction};

/// Convolve an image with a kernel.
///
/// The kernel is applied as a correlation anchored at its centre (no
/// flip). With `normalize` set and a non-zero kernel sum, the kernel is
/// divided by its sum first. Output samples are rounded half-to-even and
/// clamped to `0..=255`.
///
/// An all-zero kernel is replaced by the identity; the returned
/// [`Applied`] then carries [`Correction::DegenerateKernel`].
pub fn convolve(image: &PixelBuffer, kernel: &Kernel, mode: ProcessMode, normalize: bool) -> Applied {
    let (kernel, replaced) = kernel.or_identity();
    if replaced {
        log::warn!(
            "all-zero {}x{} kernel replaced with identity",
            kernel.rows(),
            kernel.cols()
        );
    }
    let kernel = if normalize { kernel.normalized() } else { kernel };

    let out = image.map_planes(mode, |plane, w, h| correlate_plane(plane, w, h, &kernel));

    if replaced {
        Applied::corrected(out, Correction::DegenerateKernel)
    } else {
        Applied::clean(out)
    }
}

fn correlate_plane(src: &[u8], width: usize, height: usize, kernel: &Kernel) -> Vec<u8> {
    let (cy, cx) = kernel.center();
    let (cy, cx) = (cy as i64, cx as i64);

    // Border lookups are computed once per axis
    let col_index: Vec<Vec<usize>> = (0..width as i64)
        .map(|x| {
            (0..kernel.cols() as i64)
                .map(|kx| reflect_101(x + kx - cx, width))
                .collect()
        })
        .collect();

    let mut dst = Vec::with_capacity(src.len());
    for y in 0..height as i64 {
        let rows: Vec<&[u8]> = (0..kernel.rows() as i64)
            .map(|ky| {
                let sy = reflect_101(y + ky - cy, height);
                &src[sy * width..(sy + 1) * width]
            })
            .collect();

        for cols in &col_index {
            let mut acc = 0.0f64;
            for (ky, row) in rows.iter().enumerate() {
                for (kx, &sx) in cols.iter().enumerate() {
                    acc += kernel.get(ky, kx) * row[sx] as f64;
                }
            }
            dst.push(acc.round_ties_even().clamp(0.0, 255.0) as u8);
        }
    }
    dst
}
