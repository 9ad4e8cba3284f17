//! Human-readable image summary for the info panel.

use std::fmt;

use serde::Serialize;

use crate::buffer::{ColorMode, PixelBuffer};

/// Format a byte count with binary units, e.g. `"1.50 KB"`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Facts about an image, rendered through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub path: Option<String>,
    pub file_size: u64,
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    /// File format guessed from the path extension.
    pub format: String,
    pub bits_per_pixel: u32,
    /// Size of the decoded samples in memory.
    pub decoded_bytes: u64,
    pub has_alpha: bool,
    /// Length of the ICC profile blob, 0 when absent.
    pub icc_len: usize,
}

impl ImageSummary {
    /// Describe `image`. The buffer is only read.
    pub fn describe(image: &PixelBuffer, path: Option<&str>, file_size: u64, icc_profile: Option<&[u8]>) -> Self {
        let format = path
            .and_then(|p| std::path::Path::new(p).extension())
            .map(|ext| ext.to_string_lossy().to_ascii_uppercase())
            .unwrap_or_else(|| "N/A".to_string());
        let mode = image.mode();

        Self {
            path: path.map(str::to_string),
            file_size,
            width: image.width(),
            height: image.height(),
            mode,
            format,
            bits_per_pixel: mode.bits_per_pixel(),
            decoded_bytes: image.pixel_count() as u64 * mode.bits_per_pixel() as u64 / 8,
            has_alpha: mode.has_alpha(),
            icc_len: icc_profile.map_or(0, <[u8]>::len),
        }
    }
}

impl fmt::Display for ImageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path: {}", self.path.as_deref().unwrap_or("None"))?;
        writeln!(f, "File size: {} ({} bytes)", human_size(self.file_size), self.file_size)?;
        writeln!(f, "Resolution (pixels): {} × {}", self.width, self.height)?;
        writeln!(f, "File format: {}", self.format)?;
        writeln!(f, "Color mode: {} - {}", self.mode.tag(), self.mode.description())?;
        writeln!(f, "Bit depth: {} bits/pixel", self.bits_per_pixel)?;
        writeln!(f, "Channels: {}", self.mode.bands())?;
        writeln!(f, "Decoded memory: {}", human_size(self.decoded_bytes))?;
        writeln!(f, "Alpha channel: {}", if self.has_alpha { "yes" } else { "no" })?;
        if self.icc_len > 0 {
            write!(f, "ICC profile: present ({} bytes)", self.icc_len)
        } else {
            write!(f, "ICC profile: none")
        }
    }
}
