//! Editing session: current and original image plus undo history.
//!
//! Every edit goes through the same two-step protocol. [`EditSession::preview`]
//! runs a transform on the current image and returns the result without
//! touching any state, so a dialog can call it as often as its parameters
//! change. [`EditSession::apply`] runs the transform once more, records the
//! replaced image in the history and adopts the result.

use serde::{Deserialize, Serialize};

use crate::buffer::{LoadedImage, PixelBuffer};
use crate::error::{EditError, Result};
use crate::histogram::compute_histogram;
use crate::history::{EditHistory, DEFAULT_HISTORY_CAPACITY};
use crate::summary::ImageSummary;
use crate::{Applied, Correction, HistogramTable};

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Snapshots kept for undo (and redo).
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Which image a histogram is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramSource {
    #[default]
    Current,
    Original,
    /// The image before the last committed edit, or the current one when
    /// there is nothing to undo.
    Previous,
}

/// Pixels and metadata of the open image.
#[derive(Debug, Clone)]
struct Document {
    original: PixelBuffer,
    current: PixelBuffer,
    path: Option<String>,
    file_size: u64,
    exif: Option<Vec<u8>>,
    icc_profile: Option<Vec<u8>>,
    /// The original is on screen instead of the current image.
    showing_original: bool,
}

/// Single-writer owner of the image being edited.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    document: Option<Document>,
    history: EditHistory,
}

impl EditSession {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            document: None,
            history: EditHistory::new(config.history_capacity),
        }
    }

    /// Open a freshly loaded image. Clears the history.
    pub fn open(&mut self, image: LoadedImage) {
        log::debug!(
            "opening {}x{} {} image",
            image.buffer.width(),
            image.buffer.height(),
            image.buffer.mode().tag()
        );
        self.history.clear();
        self.document = Some(Document {
            original: image.buffer.clone(),
            current: image.buffer,
            path: image.path,
            file_size: image.file_size,
            exif: image.exif,
            icc_profile: image.icc_profile,
            showing_original: false,
        });
    }

    pub fn has_image(&self) -> bool {
        self.document.is_some()
    }

    /// The image on screen: the original while it is held, else the current one.
    pub fn displayed(&self) -> Option<&PixelBuffer> {
        self.document
            .as_ref()
            .map(|doc| if doc.showing_original { &doc.original } else { &doc.current })
    }

    /// The committed working image.
    pub fn current(&self) -> Option<&PixelBuffer> {
        self.document.as_ref().map(|doc| &doc.current)
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.document.as_ref().map(|doc| &doc.original)
    }

    pub fn exif(&self) -> Option<&[u8]> {
        self.document.as_ref().and_then(|doc| doc.exif.as_deref())
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.document.as_ref().and_then(|doc| doc.icc_profile.as_deref())
    }

    pub fn path(&self) -> Option<&str> {
        self.document.as_ref().and_then(|doc| doc.path.as_deref())
    }

    /// Record a new path after the host saved the image elsewhere.
    pub fn set_path(&mut self, path: impl Into<String>) {
        if let Some(doc) = self.document.as_mut() {
            doc.path = Some(path.into());
        }
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.has_image() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.has_image() && self.history.can_redo()
    }

    /// Run `transform` on the current image without committing anything.
    pub fn preview<F, R>(&self, transform: F) -> Result<Applied>
    where
        F: FnOnce(&PixelBuffer) -> R,
        R: Into<Applied>,
    {
        let current = self.current().ok_or(EditError::NoImage)?;
        Ok(transform(current).into())
    }

    /// Run `transform` on the current image and commit the result.
    ///
    /// Returns the correction the transform reported, if any.
    pub fn apply<F, R>(&mut self, transform: F) -> Result<Option<Correction>>
    where
        F: FnOnce(&PixelBuffer) -> R,
        R: Into<Applied>,
    {
        self.release_original();
        let doc = self.document.as_mut().ok_or(EditError::NoImage)?;
        let Applied { image, correction } = transform(&doc.current).into();
        let previous = std::mem::replace(&mut doc.current, image);
        self.history.push(previous);
        Ok(correction)
    }

    /// Step back one edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.release_original();
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        match self.history.undo(doc.current.clone()) {
            Some(previous) => {
                doc.current = previous;
                true
            }
            None => false,
        }
    }

    /// Step forward one edit. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.release_original();
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        match self.history.redo(doc.current.clone()) {
            Some(next) => {
                doc.current = next;
                true
            }
            None => false,
        }
    }

    /// Throw away all edits and return to the original. Clears the history.
    pub fn reset(&mut self) -> bool {
        self.release_original();
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        self.history.clear();
        doc.current = doc.original.clone();
        true
    }

    /// Show the original until [`release_original`](Self::release_original).
    ///
    /// Returns `false` when no image is open or the original is already held.
    pub fn hold_original(&mut self) -> bool {
        match self.document.as_mut() {
            Some(doc) if !doc.showing_original => {
                doc.showing_original = true;
                true
            }
            _ => false,
        }
    }

    /// Go back to showing the current image after [`hold_original`](Self::hold_original).
    pub fn release_original(&mut self) -> bool {
        match self.document.as_mut() {
            Some(doc) if doc.showing_original => {
                doc.showing_original = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_holding_original(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| doc.showing_original)
    }

    pub fn histogram(&self, source: HistogramSource) -> Option<HistogramTable> {
        let doc = self.document.as_ref()?;
        let image = match source {
            HistogramSource::Original => &doc.original,
            HistogramSource::Previous => self.history.peek_undo().unwrap_or(&doc.current),
            HistogramSource::Current => self.displayed()?,
        };
        Some(compute_histogram(image))
    }

    /// Summary of the image on screen.
    pub fn summary(&self) -> Option<ImageSummary> {
        let doc = self.document.as_ref()?;
        let image = self.displayed()?;
        Some(ImageSummary::describe(
            image,
            doc.path.as_deref(),
            doc.file_size,
            doc.icc_profile.as_deref(),
        ))
    }
}
