//! WASM bindings for convolution and median filtering.
//!
//! Kernels cross the boundary as plain 2-D arrays of numbers
//! (`number[][]`), the same shape the preset file uses. Processing modes are
//! the tags `"L"` (work on luminance) and `"RGB"` (per colour channel).

use crate::types::{parse_process_mode, to_js_error, JsApplied, JsPixelBuffer};
use retouch_core::filter::{self, FilterOp, Kernel, KernelPreset};
use wasm_bindgen::prelude::*;

/// Apply the fixed sharpening kernel.
#[wasm_bindgen]
pub fn sharpen(image: &JsPixelBuffer, mode: &str) -> Result<JsApplied, JsValue> {
    let mode = parse_process_mode(mode)?;
    Ok(JsApplied::from_core(filter::filter_apply(
        image.as_core(),
        FilterOp::Sharpen,
        None,
        mode,
        false,
    )))
}

/// Apply the fixed emboss kernel.
#[wasm_bindgen]
pub fn emboss(image: &JsPixelBuffer, mode: &str) -> Result<JsApplied, JsValue> {
    let mode = parse_process_mode(mode)?;
    Ok(JsApplied::from_core(filter::filter_apply(
        image.as_core(),
        FilterOp::Emboss,
        None,
        mode,
        false,
    )))
}

/// Blur along a straight line `length` pixels long at `angle` degrees.
#[wasm_bindgen]
pub fn motion_blur(
    image: &JsPixelBuffer,
    length: usize,
    angle: f64,
    mode: &str,
    normalize: bool,
) -> Result<JsApplied, JsValue> {
    let mode = parse_process_mode(mode)?;
    let op = FilterOp::Motion { length, angle };
    Ok(JsApplied::from_core(filter::filter_apply(image.as_core(), op, None, mode, normalize)))
}

/// Replace each sample by the median of its `size x size` window.
///
/// Even sizes are raised to the next odd size.
#[wasm_bindgen]
pub fn median_filter(image: &JsPixelBuffer, size: usize, mode: &str) -> Result<JsPixelBuffer, JsValue> {
    let mode = parse_process_mode(mode)?;
    Ok(JsPixelBuffer::from_core(filter::median_filter(image.as_core(), size, mode)))
}

/// Convolve with a caller-supplied kernel.
///
/// An all-zero kernel is replaced by the identity; check `correction` on
/// the result to tell the user.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const blurred = convolve(image, [[1, 1, 1], [1, 1, 1], [1, 1, 1]], "RGB", true);
/// if (blurred.correction) showWarning(blurred.correction);
/// ```
#[wasm_bindgen]
pub fn convolve(image: &JsPixelBuffer, kernel: JsValue, mode: &str, normalize: bool) -> Result<JsApplied, JsValue> {
    let kernel: Kernel = serde_wasm_bindgen::from_value(kernel).map_err(to_js_error)?;
    let mode = parse_process_mode(mode)?;
    Ok(JsApplied::from_core(filter::convolve(image.as_core(), &kernel, mode, normalize)))
}

/// Single entry point used by the filter dialog.
///
/// `op` is either a tag (`"sharpen"`, `"emboss"`, `"motion"`, `"median"`,
/// `"custom"`), which picks default parameters, or an object such as
/// `{ op: "motion", length: 15, angle: 30 }`. `kernel` may be `null` for
/// every operation but `"custom"`.
#[wasm_bindgen]
pub fn filter_apply(
    image: &JsPixelBuffer,
    op: JsValue,
    kernel: JsValue,
    mode: &str,
    normalize: bool,
) -> Result<JsApplied, JsValue> {
    let op: FilterOp = match op.as_string() {
        Some(tag) => tag.parse().map_err(to_js_error)?,
        None => serde_wasm_bindgen::from_value(op).map_err(to_js_error)?,
    };
    let kernel: Option<Kernel> = if kernel.is_null() || kernel.is_undefined() {
        None
    } else {
        Some(serde_wasm_bindgen::from_value(kernel).map_err(to_js_error)?)
    };
    let mode = parse_process_mode(mode)?;
    Ok(JsApplied::from_core(filter::filter_apply(
        image.as_core(),
        op,
        kernel.as_ref(),
        mode,
        normalize,
    )))
}

/// Names of the built-in kernel presets, in menu order.
#[wasm_bindgen]
pub fn kernel_preset_names() -> Result<JsValue, JsValue> {
    let names: Vec<&str> = KernelPreset::ALL.iter().map(|p| p.name()).collect();
    serde_wasm_bindgen::to_value(&names).map_err(to_js_error)
}

/// Build a built-in kernel preset at the requested size as `number[][]`.
#[wasm_bindgen]
pub fn kernel_preset(name: &str, rows: usize, cols: usize) -> Result<JsValue, JsValue> {
    let preset = KernelPreset::from_name(name).ok_or_else(|| to_js_error(format!("Unknown kernel preset: {}", name)))?;
    serde_wasm_bindgen::to_value(&preset.kernel(rows, cols)).map_err(to_js_error)
}

/// The kernel `motion_blur` would use, as `number[][]`.
#[wasm_bindgen]
pub fn motion_kernel(length: usize, angle: f64) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&filter::motion_kernel(length, angle)).map_err(to_js_error)
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use retouch_core::{ColorMode, PixelBuffer};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn flat() -> JsPixelBuffer {
        JsPixelBuffer::from_core(PixelBuffer::filled(4, 4, ColorMode::Luminance, 50))
    }

    #[wasm_bindgen_test]
    fn test_convolve_zero_kernel_reports_correction() {
        let kernel = serde_wasm_bindgen::to_value(&vec![vec![0.0; 3]; 3]).unwrap();
        let result = convolve(&flat(), kernel, "L", true).unwrap();
        assert!(result.correction().is_some());
        assert_eq!(result.image().pixels(), flat().pixels());
    }

    #[wasm_bindgen_test]
    fn test_filter_apply_by_tag() {
        let result = filter_apply(&flat(), JsValue::from_str("median"), JsValue::NULL, "L", false).unwrap();
        assert_eq!(result.image().pixels(), flat().pixels());
    }

    #[wasm_bindgen_test]
    fn test_filter_apply_unknown_tag() {
        assert!(filter_apply(&flat(), JsValue::from_str("swirl"), JsValue::NULL, "L", false).is_err());
    }

    #[wasm_bindgen_test]
    fn test_kernel_preset_round_trip() {
        let value = kernel_preset("Box blur", 3, 3).unwrap();
        let kernel: Kernel = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(kernel.sum(), 9.0);
        assert!(kernel_preset("Nope", 3, 3).is_err());
    }
}
