//! WASM bindings for geometric transforms.
//!
//! Flips and quarter turns are exact pixel permutations. Arbitrary-angle
//! rotation expands the canvas so nothing is clipped and fills the new
//! corners with black (transparent for RGBA).

use crate::types::JsPixelBuffer;
use retouch_core::transform;
use wasm_bindgen::prelude::*;

/// Mirror left to right.
#[wasm_bindgen]
pub fn flip_horizontal(image: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_core(transform::flip_horizontal(image.as_core()))
}

/// Mirror top to bottom.
#[wasm_bindgen]
pub fn flip_vertical(image: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_core(transform::flip_vertical(image.as_core()))
}

/// Quarter turn clockwise. Width and height swap.
#[wasm_bindgen]
pub fn rotate90_cw(image: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_core(transform::rotate90_cw(image.as_core()))
}

/// Quarter turn counter-clockwise. Width and height swap.
#[wasm_bindgen]
pub fn rotate90_ccw(image: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_core(transform::rotate90_ccw(image.as_core()))
}

#[wasm_bindgen]
pub fn rotate180(image: &JsPixelBuffer) -> JsPixelBuffer {
    JsPixelBuffer::from_core(transform::rotate180(image.as_core()))
}

/// Rotate an image clockwise by an arbitrary angle.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise)
///
/// # Returns
///
/// New `JsPixelBuffer` sized to hold the whole rotated image.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const straightened = rotate(image, -2.5);
/// ```
#[wasm_bindgen]
pub fn rotate(image: &JsPixelBuffer, angle_degrees: f64) -> JsPixelBuffer {
    JsPixelBuffer::from_core(transform::rotate(image.as_core(), angle_degrees))
}

/// Output dimensions `[width, height]` of `rotate` for a given angle.
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> Vec<u32> {
    let (w, h) = transform::compute_rotated_bounds(width, height, angle_degrees);
    vec![w, h]
}
