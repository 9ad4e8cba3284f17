//! WASM bindings for tonal adjustments.
//!
//! Grayscale conversion, brightness/saturation/contrast and black-and-white
//! levels. Each call returns a new image and leaves the source untouched.

use crate::types::JsPixelBuffer;
use retouch_core::tonal::{self, LevelsParams};
use wasm_bindgen::prelude::*;

/// Convert an image to single-channel luminance.
#[wasm_bindgen]
pub fn to_grayscale(image: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_core(tonal::to_grayscale(image.as_core()))
}

/// Adjust brightness, saturation and contrast.
///
/// Each factor is a multiplier where 1.0 means unchanged. Alpha is kept.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // Slightly brighter, more saturated
/// const edited = adjust_bsc(image, 1.2, 1.3, 1.0);
/// ```
#[wasm_bindgen]
pub fn adjust_bsc(image: &JsPixelBuffer, brightness: f32, saturation: f32, contrast: f32) -> JsPixelBuffer {
    JsPixelBuffer::from_core(tonal::adjust_bsc(image.as_core(), brightness, saturation, contrast))
}

/// Remap luminance so `black` maps to 0 and `white` to 255 with a gamma curve.
///
/// The result is always a luminance image. Out-of-range parameters are
/// clamped rather than rejected.
#[wasm_bindgen]
pub fn bw_levels(image: &JsPixelBuffer, black: i32, white: i32, gamma: f64) -> JsPixelBuffer {
    JsPixelBuffer::from_core(tonal::bw_levels(image.as_core(), black, white, gamma))
}

/// The 256-entry lookup table `bw_levels` would use, for drawing the curve.
#[wasm_bindgen]
pub fn levels_lut(black: i32, white: i32, gamma: f64) -> Vec<u8> {
    tonal::levels_lut(&LevelsParams::new(black, white, gamma)).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::{ColorMode, PixelBuffer};

    fn rgb(width: u32, height: u32, value: u8) -> JsPixelBuffer {
        JsPixelBuffer::from_core(PixelBuffer::filled(width, height, ColorMode::Rgb, value))
    }

    #[test]
    fn test_to_grayscale() {
        let result = to_grayscale(&rgb(4, 3, 90));
        assert_eq!(result.mode(), "L");
        assert_eq!(result.width(), 4);
        assert_eq!(result.height(), 3);
        assert!(result.pixels().iter().all(|&p| p == 90));
    }

    #[test]
    fn test_adjust_bsc_identity() {
        let source = rgb(3, 3, 77);
        let result = adjust_bsc(&source, 1.0, 1.0, 1.0);
        assert_eq!(result.pixels(), source.pixels());
    }

    #[test]
    fn test_adjust_bsc_brightness_clamps() {
        let result = adjust_bsc(&rgb(2, 2, 200), 2.0, 1.0, 1.0);
        assert!(result.pixels().iter().all(|&p| p == 255));
    }

    #[test]
    fn test_bw_levels_full_range_is_identity() {
        let source = JsPixelBuffer::from_core(PixelBuffer::from_fn(16, 16, ColorMode::Luminance, |x, y, out| {
            out[0] = (y * 16 + x) as u8;
        }));
        let result = bw_levels(&source, 0, 255, 1.0);
        assert_eq!(result.pixels(), source.pixels());
    }

    #[test]
    fn test_levels_lut() {
        let lut = levels_lut(64, 192, 1.0);
        assert_eq!(lut.len(), 256);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[64], 0);
        assert_eq!(lut[192], 255);
        assert_eq!(lut[255], 255);
    }
}
