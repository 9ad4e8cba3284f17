//! Luminance calculation using ITU-R BT.601 weights.
//!
//! Grayscale conversion, the L processing mode of neighbourhood filters and
//! the saturation/contrast degenerate images all go through this module so
//! that every "luminance" in the engine is the same number.
//!
//! The integer form uses 16-bit fixed point weights that sum to exactly
//! `1 << 16`, which keeps gray pixels (r == g == b) unchanged.

/// BT.601 red weight in 16-bit fixed point (0.299).
pub const LUMA_R: u32 = 19595;

/// BT.601 green weight in 16-bit fixed point (0.587).
pub const LUMA_G: u32 = 38470;

/// BT.601 blue weight in 16-bit fixed point (0.114).
pub const LUMA_B: u32 = 7471;

/// Calculate luminance from u8 RGB values (0 to 255).
///
/// Rounds to nearest using the fixed point half `0x8000`.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32 + 0x8000;
    (lum >> 16) as u8
}
