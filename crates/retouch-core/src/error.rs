//! Error types for editing operations.
//!
//! Only conditions the caller cannot recover from locally are errors.
//! Parameter coercions (odd sizes, white <= black, gamma floor) succeed
//! silently, and degenerate kernels are reported through
//! [`Correction`](crate::Correction) next to the produced image.

use thiserror::Error;

/// Errors produced by the editing engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    /// Pixel storage does not match `width * height * channels`.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// Kernel weights are empty or rows have different lengths.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// Operation tag outside the known filter/morphology enumerations.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Attempt to overwrite or remove a built-in preset.
    #[error("Preset name is reserved: {0}")]
    ReservedPresetName(String),

    /// No stored preset under the given name.
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// Session operation that needs an open image.
    #[error("No image loaded")]
    NoImage,

    /// Rename target is already taken by another stored preset.
    #[error("Preset already exists: {0}")]
    PresetExists(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, EditError>;
