//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate provides WASM bindings to expose the retouch-core engine
//! to a browser UI written in JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - `JsPixelBuffer` and `JsApplied` wrapper types
//! - `tonal` - Grayscale, brightness/saturation/contrast, levels
//! - `transform` - Flips, quarter turns, arbitrary rotation
//! - `filter` - Convolution, motion blur, median
//! - `morphology` - Erosion, dilation and their compounds
//! - `histogram` - Histogram tables
//! - `session` - `JsEditSession` with undo/redo
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, JsPixelBuffer, rotate } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = new JsPixelBuffer(width, height, "RGBA", rgbaBytes);
//! const session = new JsEditSession();
//! session.open(image, file.name, file.size);
//!
//! // Preview, then commit
//! const preview = rotate(session.current(), 12.5);
//! session.commit(preview);
//! ```

use wasm_bindgen::prelude::*;

mod filter;
mod histogram;
mod morphology;
mod session;
mod tonal;
mod transform;
mod types;

// Re-export public types
pub use filter::{
    convolve, emboss, filter_apply, kernel_preset, kernel_preset_names, median_filter, motion_blur, motion_kernel,
    sharpen,
};
pub use histogram::{compute_histogram, rebin_histogram, JsHistogram};
pub use morphology::{element_shape, element_shape_names, morphology_apply, morphology_shape};
pub use session::JsEditSession;
pub use tonal::{adjust_bsc, bw_levels, levels_lut, to_grayscale};
pub use transform::{flip_horizontal, flip_vertical, rotate, rotate180, rotate90_ccw, rotate90_cw, rotated_bounds};
pub use types::{JsApplied, JsPixelBuffer};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
