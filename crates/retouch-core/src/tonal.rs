//! Tonal adjustments: grayscale, brightness/saturation/contrast and
//! black-and-white levels with gamma.
//!
//! ## Adjustment Order
//! `adjust_bsc` always applies its factors in this order:
//! 1. Brightness
//! 2. Saturation
//! 3. Contrast
//!
//! Each factor blends the image with a "degenerate" version of itself:
//! `out = degenerate + factor * (in - degenerate)`, so 1.0 is the identity,
//! 0.0 yields the degenerate image and values above 1.0 extrapolate.

use serde::{Deserialize, Serialize};

use crate::buffer::{ColorMode, PixelBuffer};
use crate::luminance::luma_u8;

/// Smallest gamma accepted by levels correction.
pub const MIN_GAMMA: f64 = 0.01;

/// Brightness, saturation and contrast factors (1.0 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BscParams {
    pub brightness: f32,
    pub saturation: f32,
    pub contrast: f32,
}

impl Default for BscParams {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            saturation: 1.0,
            contrast: 1.0,
        }
    }
}

impl BscParams {
    pub fn new(brightness: f32, saturation: f32, contrast: f32) -> Self {
        Self {
            brightness,
            saturation,
            contrast,
        }
    }

    /// Check if all factors are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Black point, white point and gamma for levels correction.
///
/// Construction coerces out-of-range input instead of failing:
/// points are clamped to 0..=255, a white point at or below the black point
/// becomes `black + 1`, and gamma is floored at [`MIN_GAMMA`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLevels")]
pub struct LevelsParams {
    black: i32,
    white: i32,
    gamma: f64,
}

/// Deserialized levels before coercion.
#[derive(Deserialize)]
struct RawLevels {
    black: i32,
    white: i32,
    gamma: f64,
}

impl From<RawLevels> for LevelsParams {
    fn from(raw: RawLevels) -> Self {
        LevelsParams::new(raw.black, raw.white, raw.gamma)
    }
}

impl Default for LevelsParams {
    fn default() -> Self {
        Self {
            black: 0,
            white: 255,
            gamma: 1.0,
        }
    }
}

impl LevelsParams {
    pub fn new(black: i32, white: i32, gamma: f64) -> Self {
        let black = black.clamp(0, 255);
        let mut white = white.clamp(0, 255);
        if white <= black {
            log::debug!("levels: white point {} <= black point {}, using {}", white, black, black + 1);
            white = black + 1;
        }
        let gamma = if gamma.is_nan() || gamma < MIN_GAMMA {
            log::debug!("levels: gamma {} floored to {}", gamma, MIN_GAMMA);
            MIN_GAMMA
        } else {
            gamma
        };
        Self { black, white, gamma }
    }

    pub fn black(&self) -> i32 {
        self.black
    }

    /// White point. May be 256 when the black point is 255.
    pub fn white(&self) -> i32 {
        self.white
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

/// Convert any image to single-channel luminance (BT.601).
pub fn to_grayscale(image: &PixelBuffer) -> PixelBuffer {
    image.convert(ColorMode::Luminance)
}

/// Apply brightness, then saturation, then contrast.
///
/// Negative or non-finite factors are coerced to 0.0. Saturation is a no-op
/// on luminance images. Alpha is never modified.
pub fn adjust_bsc(image: &PixelBuffer, brightness: f32, saturation: f32, contrast: f32) -> PixelBuffer {
    let brightness = coerce_factor("brightness", brightness);
    let saturation = coerce_factor("saturation", saturation);
    let contrast = coerce_factor("contrast", contrast);

    let out = apply_brightness(image, brightness);
    let out = apply_saturation(&out, saturation);
    apply_contrast(&out, contrast)
}

/// [`adjust_bsc`] taking a parameter struct.
pub fn adjust(image: &PixelBuffer, params: &BscParams) -> PixelBuffer {
    adjust_bsc(image, params.brightness, params.saturation, params.contrast)
}

#[inline]
fn coerce_factor(name: &str, factor: f32) -> f32 {
    if factor.is_finite() && factor >= 0.0 {
        factor
    } else {
        log::debug!("{} factor {} coerced to 0.0", name, factor);
        0.0
    }
}

/// Blend `value` away from `degenerate` by `factor`, clamped and truncated.
#[inline]
fn blend(degenerate: u8, value: u8, factor: f32) -> u8 {
    let d = degenerate as f32;
    (d + factor * (value as f32 - d)).clamp(0.0, 255.0) as u8
}

/// Rewrite the colour channels of every pixel, leaving alpha in place.
fn map_color<F>(image: &PixelBuffer, mut f: F) -> PixelBuffer
where
    F: FnMut(&mut [u8]),
{
    let ch = image.channels();
    let color = image.mode().color_channels();
    let mut data = image.to_vec();
    for px in data.chunks_exact_mut(ch) {
        f(&mut px[..color]);
    }
    PixelBuffer::from_parts(image.width(), image.height(), image.mode(), data)
}

fn apply_brightness(image: &PixelBuffer, factor: f32) -> PixelBuffer {
    if factor == 1.0 {
        return image.clone();
    }
    map_color(image, |px| {
        for v in px.iter_mut() {
            *v = blend(0, *v, factor);
        }
    })
}

fn apply_saturation(image: &PixelBuffer, factor: f32) -> PixelBuffer {
    if factor == 1.0 || image.mode() == ColorMode::Luminance {
        return image.clone();
    }
    map_color(image, |px| {
        let gray = luma_u8(px[0], px[1], px[2]);
        for v in px.iter_mut() {
            *v = blend(gray, *v, factor);
        }
    })
}

fn apply_contrast(image: &PixelBuffer, factor: f32) -> PixelBuffer {
    if factor == 1.0 || image.is_empty() {
        return image.clone();
    }
    let mean = mean_luminance(image);
    map_color(image, |px| {
        for v in px.iter_mut() {
            *v = blend(mean, *v, factor);
        }
    })
}

/// Mean luminance of the whole image, rounded to the nearest integer.
fn mean_luminance(image: &PixelBuffer) -> u8 {
    let ch = image.channels();
    let sum: u64 = image
        .samples()
        .chunks_exact(ch)
        .map(|px| match image.mode() {
            ColorMode::Luminance => px[0] as u64,
            _ => luma_u8(px[0], px[1], px[2]) as u64,
        })
        .sum();
    let mean = sum as f64 / image.pixel_count() as f64;
    (mean + 0.5) as u8
}

/// Build the 256-entry levels LUT.
///
/// Inputs at or below the black point map to 0, at or above the white point
/// to 255. In between the input is rescaled to [0, 1], raised to `gamma`
/// and scaled back; rounding is half-to-even.
pub fn levels_lut(params: &LevelsParams) -> [u8; 256] {
    let (black, white, gamma) = (params.black, params.white, params.gamma);
    let scale = 255.0 / (white - black) as f64;

    let mut lut = [0u8; 256];
    for (x, out) in lut.iter_mut().enumerate() {
        let x = x as i32;
        let y = if x <= black {
            0.0
        } else if x >= white {
            255.0
        } else {
            let linear = (x - black) as f64 * scale;
            (linear / 255.0).powf(gamma) * 255.0
        };
        *out = y.clamp(0.0, 255.0).round_ties_even() as u8;
    }
    lut
}

/// Black-and-white levels correction.
///
/// The image is converted to luminance first; the result is always a
/// luminance buffer.
pub fn bw_levels(image: &PixelBuffer, black: i32, white: i32, gamma: f64) -> PixelBuffer {
    apply_levels(image, &LevelsParams::new(black, white, gamma))
}

/// [`bw_levels`] taking a parameter struct.
pub fn apply_levels(image: &PixelBuffer, params: &LevelsParams) -> PixelBuffer {
    let lut = levels_lut(params);
    let gray = to_grayscale(image);
    let data = gray.samples().iter().map(|&v| lut[v as usize]).collect();
    PixelBuffer::from_parts(gray.width(), gray.height(), ColorMode::Luminance, data)
}
