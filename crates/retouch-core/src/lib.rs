//! Retouch Core - Image editing engine
//!
//! This crate provides the pixel operations behind the Retouch editor:
//! tonal adjustments, geometric transforms, convolution and median
//! filtering, morphology, histograms, and the bounded undo/redo history
//! that makes "preview, then commit" editing reversible.
//!
//! Every operation takes a [`PixelBuffer`] by reference and returns a new
//! one. Nothing here performs I/O.

pub mod buffer;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod history;
pub mod luminance;
pub mod morphology;
pub mod presets;
pub mod session;
pub mod summary;
pub mod tonal;
pub mod transform;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use buffer::{ColorMode, LoadedImage, PixelBuffer, ProcessMode};
pub use error::{EditError, Result};
pub use filter::{convolve, filter_apply, median_filter, motion_kernel, FilterOp, Kernel, KernelPreset};
pub use histogram::compute_histogram;
pub use history::EditHistory;
pub use morphology::{morphology_apply, ElementShape, MorphOp, StructuringElement};
pub use presets::{MemoryPresetStore, PresetStore};
pub use session::{EditSession, HistogramSource, SessionConfig};
pub use summary::ImageSummary;
pub use tonal::{adjust_bsc, bw_levels, to_grayscale, BscParams, LevelsParams};
pub use transform::{flip_horizontal, flip_vertical, rotate, rotate180, rotate90_ccw, rotate90_cw};

/// A recoverable problem fixed while applying an operation.
///
/// The operation still produced an image; the caller should tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Correction {
    /// All-zero convolution kernel replaced by the identity.
    DegenerateKernel,
    /// Empty structuring element replaced by a single centre cell.
    DegenerateElement,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correction::DegenerateKernel => {
                f.write_str("Kernel must not be all zeros; a unit centre weight was used instead")
            }
            Correction::DegenerateElement => {
                f.write_str("Structuring element must not be empty; the centre cell was used instead")
            }
        }
    }
}

/// Output of an operation that may need to correct its input.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub image: PixelBuffer,
    pub correction: Option<Correction>,
}

impl Applied {
    pub fn clean(image: PixelBuffer) -> Self {
        Self {
            image,
            correction: None,
        }
    }

    pub fn corrected(image: PixelBuffer, correction: Correction) -> Self {
        Self {
            image,
            correction: Some(correction),
        }
    }

    pub fn into_image(self) -> PixelBuffer {
        self.image
    }
}

impl From<PixelBuffer> for Applied {
    fn from(image: PixelBuffer) -> Self {
        Self::clean(image)
    }
}

/// Histogram data for an image (256 bins per channel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramTable {
    /// Single-channel image
    Luminance { luminance: [u32; 256] },
    /// Colour image, binned after conversion to RGB
    Rgb {
        red: [u32; 256],
        green: [u32; 256],
        blue: [u32; 256],
    },
}

impl HistogramTable {
    /// Channels with their band names, in display order.
    pub fn channels(&self) -> Vec<(&'static str, &[u32; 256])> {
        match self {
            HistogramTable::Luminance { luminance } => vec![("L", luminance)],
            HistogramTable::Rgb { red, green, blue } => vec![("R", red), ("G", green), ("B", blue)],
        }
    }

    pub fn is_luminance(&self) -> bool {
        matches!(self, HistogramTable::Luminance { .. })
    }

    /// Pixel count, i.e. the sum of any one channel.
    pub fn total(&self) -> u64 {
        self.channels()
            .first()
            .map(|(_, bins)| bins.iter().map(|&c| c as u64).sum())
            .unwrap_or(0)
    }

    /// Find the maximum value across all channels for normalization
    pub fn max_value(&self) -> u32 {
        self.channels()
            .iter()
            .filter_map(|(_, bins)| bins.iter().max().copied())
            .max()
            .unwrap_or(0)
    }

    /// Check for highlight clipping (values at 255)
    pub fn has_highlight_clipping(&self) -> bool {
        self.channels().iter().any(|(_, bins)| bins[255] > 0)
    }

    /// Check for shadow clipping (values at 0)
    pub fn has_shadow_clipping(&self) -> bool {
        self.channels().iter().any(|(_, bins)| bins[0] > 0)
    }
}
