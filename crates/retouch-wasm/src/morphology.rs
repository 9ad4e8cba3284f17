//! WASM bindings for morphological operations.
//!
//! Structuring elements cross the boundary as 2-D arrays of 0/1
//! (`number[][]`).

use crate::types::{parse_process_mode, to_js_error, JsApplied, JsPixelBuffer};
use retouch_core::morphology::{self, ElementShape, MorphOp, StructuringElement};
use wasm_bindgen::prelude::*;

/// Apply a morphological operation.
///
/// # Arguments
///
/// * `op` - `"erode"`, `"dilate"`, `"open"`, `"close"`, `"gradient"`,
///   `"tophat"` or `"blackhat"`
/// * `element` - Structuring element as `number[][]` of 0/1
/// * `iterations` - Repeats of each inner erosion/dilation (0 counts as 1)
/// * `mode` - `"L"` or `"RGB"`
#[wasm_bindgen]
pub fn morphology_apply(
    image: &JsPixelBuffer,
    op: &str,
    element: JsValue,
    iterations: u32,
    mode: &str,
) -> Result<JsApplied, JsValue> {
    let op: MorphOp = op.parse().map_err(to_js_error)?;
    let element: StructuringElement = serde_wasm_bindgen::from_value(element).map_err(to_js_error)?;
    let mode = parse_process_mode(mode)?;
    Ok(JsApplied::from_core(morphology::morphology_apply(
        image.as_core(),
        op,
        &element,
        iterations,
        mode,
    )))
}

/// Apply a morphological operation with a built-in element shape.
#[wasm_bindgen]
pub fn morphology_shape(
    image: &JsPixelBuffer,
    op: &str,
    shape: &str,
    rows: usize,
    cols: usize,
    iterations: u32,
    mode: &str,
) -> Result<JsApplied, JsValue> {
    let op: MorphOp = op.parse().map_err(to_js_error)?;
    let element = StructuringElement::shape(parse_shape(shape)?, rows, cols);
    let mode = parse_process_mode(mode)?;
    Ok(JsApplied::from_core(morphology::morphology_apply(
        image.as_core(),
        op,
        &element,
        iterations,
        mode,
    )))
}

/// Names of the built-in element shapes, in menu order.
#[wasm_bindgen]
pub fn element_shape_names() -> Result<JsValue, JsValue> {
    let names: Vec<&str> = ElementShape::ALL.iter().map(|s| s.name()).collect();
    serde_wasm_bindgen::to_value(&names).map_err(to_js_error)
}

/// Build a built-in element shape at the requested size as `number[][]`.
#[wasm_bindgen]
pub fn element_shape(shape: &str, rows: usize, cols: usize) -> Result<JsValue, JsValue> {
    let element = StructuringElement::shape(parse_shape(shape)?, rows, cols);
    serde_wasm_bindgen::to_value(&element).map_err(to_js_error)
}

fn parse_shape(name: &str) -> Result<ElementShape, JsValue> {
    ElementShape::from_name(name).ok_or_else(|| to_js_error(format!("Unknown element shape: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::{ColorMode, PixelBuffer};

    fn dot() -> JsPixelBuffer {
        JsPixelBuffer::from_core(PixelBuffer::from_fn(5, 5, ColorMode::Luminance, |x, y, out| {
            out[0] = if (x, y) == (2, 2) { 200 } else { 0 };
        }))
    }

    #[test]
    fn test_dilate_square_grows_dot() {
        let result = morphology_shape(&dot(), "dilate", "Square", 3, 3, 1, "L").unwrap();
        assert_eq!(result.correction(), None);
        let pixels = result.image().pixels();
        let lit = pixels.iter().filter(|&&p| p == 200).count();
        assert_eq!(lit, 9);
    }

    #[test]
    fn test_erode_removes_dot() {
        let result = morphology_shape(&dot(), "erode", "Cross", 3, 3, 1, "L").unwrap();
        assert!(result.image().pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_tophat_alias() {
        let result = morphology_shape(&dot(), "top-hat", "Square", 3, 3, 1, "L").unwrap();
        // Opening removes the dot, so the top-hat keeps exactly it
        assert_eq!(result.image().pixels(), dot().pixels());
    }

    #[test]
    fn test_center_element_is_identity() {
        let result = morphology_shape(&dot(), "dilate", "Center", 3, 3, 4, "L").unwrap();
        assert_eq!(result.image().pixels(), dot().pixels());
    }
}
