//! WASM bindings for the editing session.
//!
//! The browser side runs an operation on `current()` for previews, then
//! calls `commit()` with the accepted result. The session keeps the
//! original, the committed image and the undo/redo history.

use crate::histogram::JsHistogram;
use crate::types::{to_js_error, JsPixelBuffer};
use retouch_core::{EditSession, HistogramSource, LoadedImage, SessionConfig};
use wasm_bindgen::prelude::*;

/// An editing session owned by JavaScript.
#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Create a session keeping up to `history_capacity` undo steps
    /// (100 when omitted).
    #[wasm_bindgen(constructor)]
    pub fn new(history_capacity: Option<usize>) -> JsEditSession {
        let mut config = SessionConfig::default();
        if let Some(capacity) = history_capacity {
            config.history_capacity = capacity;
        }
        Self {
            inner: EditSession::new(&config),
        }
    }

    /// Open a decoded image. Clears the history.
    ///
    /// The EXIF and ICC blobs are kept as-is for the saver.
    pub fn open(
        &mut self,
        image: &JsPixelBuffer,
        path: Option<String>,
        file_size: f64,
        exif: Option<Vec<u8>>,
        icc_profile: Option<Vec<u8>>,
    ) {
        let mut loaded = LoadedImage::from_buffer(image.as_core().clone());
        loaded.path = path;
        loaded.file_size = file_size.max(0.0) as u64;
        loaded.exif = exif;
        loaded.icc_profile = icc_profile;
        self.inner.open(loaded);
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// The committed working image.
    pub fn current(&self) -> Option<JsPixelBuffer> {
        self.inner.current().cloned().map(JsPixelBuffer::from_core)
    }

    /// The image to draw: the original while it is held, else the current one.
    pub fn displayed(&self) -> Option<JsPixelBuffer> {
        self.inner.displayed().cloned().map(JsPixelBuffer::from_core)
    }

    pub fn original(&self) -> Option<JsPixelBuffer> {
        self.inner.original().cloned().map(JsPixelBuffer::from_core)
    }

    /// Adopt `image` as the new current image, recording the old one for undo.
    pub fn commit(&mut self, image: &JsPixelBuffer) -> Result<(), JsValue> {
        let next = image.as_core().clone();
        self.inner.apply(move |_| next).map(|_| ()).map_err(to_js_error)
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    /// Discard every edit and return to the original.
    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    #[wasm_bindgen(getter)]
    pub fn undo_len(&self) -> usize {
        self.inner.history().undo_len()
    }

    #[wasm_bindgen(getter)]
    pub fn redo_len(&self) -> usize {
        self.inner.history().redo_len()
    }

    /// Show the original (e.g. while a button is pressed).
    pub fn hold_original(&mut self) -> bool {
        self.inner.hold_original()
    }

    pub fn release_original(&mut self) -> bool {
        self.inner.release_original()
    }

    #[wasm_bindgen(getter)]
    pub fn is_holding_original(&self) -> bool {
        self.inner.is_holding_original()
    }

    /// Histogram of `"current"`, `"original"` or `"previous"`.
    pub fn histogram(&self, source: &str) -> Result<Option<JsHistogram>, JsValue> {
        let source = parse_source(source).ok_or_else(|| to_js_error(format!("Unknown histogram source: {}", source)))?;
        Ok(self.inner.histogram(source).as_ref().map(JsHistogram::from_core))
    }

    /// Multi-line description of the displayed image.
    pub fn summary(&self) -> Option<String> {
        self.inner.summary().map(|s| s.to_string())
    }

    /// The same facts as `summary()`, as a plain object.
    pub fn summary_data(&self) -> Result<JsValue, JsValue> {
        match self.inner.summary() {
            Some(summary) => serde_wasm_bindgen::to_value(&summary).map_err(to_js_error),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn path(&self) -> Option<String> {
        self.inner.path().map(str::to_string)
    }

    /// Record the path the host saved the image to.
    pub fn set_path(&mut self, path: String) {
        self.inner.set_path(path);
    }

    pub fn exif(&self) -> Option<Vec<u8>> {
        self.inner.exif().map(<[u8]>::to_vec)
    }

    pub fn icc_profile(&self) -> Option<Vec<u8>> {
        self.inner.icc_profile().map(<[u8]>::to_vec)
    }
}

fn parse_source(source: &str) -> Option<HistogramSource> {
    match source {
        "current" => Some(HistogramSource::Current),
        "original" => Some(HistogramSource::Original),
        "previous" => Some(HistogramSource::Previous),
        _ => None,
    }
}
