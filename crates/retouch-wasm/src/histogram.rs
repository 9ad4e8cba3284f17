//! Histogram computation WASM bindings.
//!
//! This module provides JavaScript bindings for histogram computation.
//! Luminance images yield a single table; colour images yield red, green
//! and blue tables.

use crate::types::JsPixelBuffer;
use retouch_core::histogram::{compute_histogram as compute_histogram_core, rebin};
use retouch_core::HistogramTable;
use wasm_bindgen::prelude::*;

/// Histogram result accessible from JavaScript.
///
/// Channels that do not apply to the image are empty arrays: a luminance
/// image has no red/green/blue tables and a colour image no luminance
/// table. Present tables always have 256 bins.
#[wasm_bindgen]
pub struct JsHistogram {
    red: Vec<u32>,
    green: Vec<u32>,
    blue: Vec<u32>,
    luminance: Vec<u32>,
    total: u64,
    max_value: u32,
    has_highlight_clipping: bool,
    has_shadow_clipping: bool,
}

#[wasm_bindgen]
impl JsHistogram {
    /// Get red channel histogram (256 bins, empty for luminance images).
    pub fn red(&self) -> Vec<u32> {
        self.red.clone()
    }

    /// Get green channel histogram (256 bins, empty for luminance images).
    pub fn green(&self) -> Vec<u32> {
        self.green.clone()
    }

    /// Get blue channel histogram (256 bins, empty for luminance images).
    pub fn blue(&self) -> Vec<u32> {
        self.blue.clone()
    }

    /// Get luminance histogram (256 bins, empty for colour images).
    pub fn luminance(&self) -> Vec<u32> {
        self.luminance.clone()
    }

    /// `true` when only the luminance table is present.
    #[wasm_bindgen(getter)]
    pub fn is_luminance(&self) -> bool {
        !self.luminance.is_empty()
    }

    /// Number of pixels counted.
    #[wasm_bindgen(getter)]
    pub fn total(&self) -> f64 {
        self.total as f64
    }

    /// Get maximum bin value across all channels.
    ///
    /// Useful for normalizing histogram display.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Check if any channel has values at 255 (highlight clipping).
    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.has_highlight_clipping
    }

    /// Check if any channel has values at 0 (shadow clipping).
    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.has_shadow_clipping
    }
}

impl JsHistogram {
    pub(crate) fn from_core(hist: &HistogramTable) -> Self {
        let (red, green, blue, luminance) = match hist {
            HistogramTable::Luminance { luminance } => (Vec::new(), Vec::new(), Vec::new(), luminance.to_vec()),
            HistogramTable::Rgb { red, green, blue } => (red.to_vec(), green.to_vec(), blue.to_vec(), Vec::new()),
        };
        Self {
            red,
            green,
            blue,
            luminance,
            total: hist.total(),
            max_value: hist.max_value(),
            has_highlight_clipping: hist.has_highlight_clipping(),
            has_shadow_clipping: hist.has_shadow_clipping(),
        }
    }
}

/// Compute the histogram of an image.
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(image);
///
/// // Access data
/// const bins = hist.is_luminance ? hist.luminance() : hist.red();
/// const max = hist.max_value;        // For normalization
/// const clipped = hist.has_highlight_clipping;
///
/// // Don't forget to free!
/// hist.free();
/// ```
#[wasm_bindgen]
pub fn compute_histogram(image: &JsPixelBuffer) -> JsHistogram {
    JsHistogram::from_core(&compute_histogram_core(image.as_core()))
}

/// Fold a table with any number of levels into 256 buckets.
#[wasm_bindgen]
pub fn rebin_histogram(levels: &[u32]) -> Vec<u32> {
    rebin(levels).to_vec()
}
