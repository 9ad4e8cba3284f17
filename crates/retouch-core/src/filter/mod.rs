//! Convolution and median filtering.
//!
//! Both filters extend the image past its borders by reflect-101
//! mirroring (`dcb|abcd|cba`, the edge sample is not repeated), so every
//! output pixel is defined and the image size never changes.

mod convolve;
mod kernel;
mod median;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, ProcessMode};
use crate::error::{EditError, Result};
use crate::{Applied, Correction};

pub use convolve::convolve;
pub use kernel::{emboss_kernel, force_odd, motion_kernel, sharpen_kernel, Kernel, KernelPreset};
pub use median::median_filter;

/// Default motion blur length.
pub const DEFAULT_MOTION_LENGTH: usize = 9;

/// Default median window size.
pub const DEFAULT_MEDIAN_SIZE: usize = 3;

/// Map a possibly out-of-range index into `0..len` by reflect-101.
#[inline]
pub(crate) fn reflect_101(index: i64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as i64 - 1);
    let i = index.rem_euclid(period);
    if i < len as i64 {
        i as usize
    } else {
        (period - i) as usize
    }
}

/// Filter operations offered by the filter dialog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum FilterOp {
    /// Fixed 3x3 sharpening kernel, never normalized.
    Sharpen,
    /// Fixed 3x3 emboss kernel, never normalized.
    Emboss,
    /// Straight-line motion blur with a synthesized kernel.
    Motion { length: usize, angle: f64 },
    /// Median of a `size x size` window.
    Median { size: usize },
    /// Caller-supplied kernel.
    Custom,
}

impl FilterOp {
    pub fn tag(&self) -> &'static str {
        match self {
            FilterOp::Sharpen => "sharpen",
            FilterOp::Emboss => "emboss",
            FilterOp::Motion { .. } => "motion",
            FilterOp::Median { .. } => "median",
            FilterOp::Custom => "custom",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FilterOp {
    type Err = EditError;

    /// Parse an operation tag. Parameterized operations get their defaults.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharpen" => Ok(FilterOp::Sharpen),
            "emboss" => Ok(FilterOp::Emboss),
            "motion" => Ok(FilterOp::Motion {
                length: DEFAULT_MOTION_LENGTH,
                angle: 0.0,
            }),
            "median" => Ok(FilterOp::Median {
                size: DEFAULT_MEDIAN_SIZE,
            }),
            "custom" => Ok(FilterOp::Custom),
            _ => Err(EditError::UnknownOperation(format!("filter '{}'", s))),
        }
    }
}

/// Apply a filter operation.
///
/// `kernel` is only consulted for [`FilterOp::Custom`]; a missing or
/// all-zero custom kernel is replaced by the identity and reported as a
/// [`Correction`]. `normalize` is honoured by the motion and custom
/// operations only.
pub fn filter_apply(
    image: &PixelBuffer,
    op: FilterOp,
    kernel: Option<&Kernel>,
    mode: ProcessMode,
    normalize: bool,
) -> Applied {
    match op {
        FilterOp::Sharpen => convolve(image, &sharpen_kernel(), mode, false),
        FilterOp::Emboss => convolve(image, &emboss_kernel(), mode, false),
        FilterOp::Motion { length, angle } => convolve(image, &motion_kernel(length, angle), mode, normalize),
        FilterOp::Median { size } => Applied::clean(median_filter(image, size, mode)),
        FilterOp::Custom => match kernel {
            Some(k) => convolve(image, k, mode, normalize),
            None => {
                log::warn!("custom filter without a kernel, using identity");
                Applied::corrected(image.clone(), Correction::DegenerateKernel)
            }
        },
    }
}
