//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Retouch
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use retouch_core::{Applied, ColorMode, Correction, PixelBuffer, ProcessMode};
use wasm_bindgen::prelude::*;

/// A pixel buffer wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is
/// made to JavaScript memory as a `Uint8Array`. Operations take the wrapper by
/// reference and return a new one, so the source stays valid.
///
/// The `free()` method can be called to explicitly release WASM memory, but
/// this is optional as wasm-bindgen's finalizer will handle cleanup
/// automatically.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from dimensions, a mode tag and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `mode` - `"L"`, `"RGB"` or `"RGBA"`
    /// * `pixels` - Row-major samples, `width * height * channels` bytes
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, mode: &str, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        let mode: ColorMode = mode.parse().map_err(to_js_error)?;
        let inner = PixelBuffer::new(width, height, mode, pixels).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Colour mode tag: `"L"`, `"RGB"` or `"RGBA"`
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.mode().tag().to_string()
    }

    /// Samples per pixel
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.inner.channels()
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.to_vec()
    }

    /// Pixel data expanded to RGBA, ready for `ImageData`.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        self.inner.convert(ColorMode::Rgba).to_vec()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_core(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn as_core(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// Result of an operation that may have corrected its input.
#[wasm_bindgen]
pub struct JsApplied {
    image: PixelBuffer,
    correction: Option<Correction>,
}

#[wasm_bindgen]
impl JsApplied {
    /// The produced image.
    pub fn image(&self) -> JsPixelBuffer {
        JsPixelBuffer::from_core(self.image.clone())
    }

    /// User-facing message when the input was corrected, otherwise undefined.
    #[wasm_bindgen(getter)]
    pub fn correction(&self) -> Option<String> {
        self.correction.map(|c| c.to_string())
    }
}

impl JsApplied {
    /// Wrap a core result, echoing any correction to the browser console.
    pub(crate) fn from_core(applied: Applied) -> Self {
        if let Some(correction) = applied.correction {
            warn_console(&correction.to_string());
        }
        Self {
            image: applied.image,
            correction: applied.correction,
        }
    }
}

/// Parse a processing mode tag (`"L"` or `"RGB"`).
pub(crate) fn parse_process_mode(mode: &str) -> Result<ProcessMode, JsValue> {
    mode.parse().map_err(to_js_error)
}

pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(target_arch = "wasm32")]
fn warn_console(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn_console(_message: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_pixel_buffer_creation() {
        let img = JsPixelBuffer::from_core(PixelBuffer::filled(100, 50, ColorMode::Rgb, 0));
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.channels(), 3);
        assert_eq!(img.mode(), "RGB");
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_js_pixel_buffer_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8]; // 2 RGB pixels
        let img = JsPixelBuffer::from_core(PixelBuffer::new(2, 1, ColorMode::Rgb, pixels.clone()).unwrap());
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.rgba_pixels(), vec![255, 128, 64, 255, 32, 16, 8, 255]);
    }

    #[test]
    fn test_luminance_rgba_pixels() {
        let img = JsPixelBuffer::from_core(PixelBuffer::filled(1, 1, ColorMode::Luminance, 40));
        assert_eq!(img.rgba_pixels(), vec![40, 40, 40, 255]);
    }

    #[test]
    fn test_js_applied_correction() {
        let img = PixelBuffer::filled(1, 1, ColorMode::Luminance, 1);
        let clean = JsApplied::from_core(Applied::clean(img.clone()));
        assert_eq!(clean.correction(), None);
        let fixed = JsApplied::from_core(Applied::corrected(img, Correction::DegenerateKernel));
        assert!(fixed.correction().is_some());
        assert_eq!(fixed.image().width(), 1);
    }

    #[test]
    fn test_parse_process_mode() {
        assert_eq!(parse_process_mode("L").ok(), Some(ProcessMode::Luminance));
        assert_eq!(parse_process_mode("RGB").ok(), Some(ProcessMode::Rgb));
    }
}
