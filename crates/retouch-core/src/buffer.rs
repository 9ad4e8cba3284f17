//! Pixel buffers and colour modes.
//!
//! A [`PixelBuffer`] is a value: its samples live behind an `Arc<[u8]>` and
//! are never written after construction. Every operation in the engine reads
//! one buffer and builds a new one, so clones are cheap (history snapshots,
//! preview "before" images) and sharing a buffer across threads needs no
//! coordination.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};
use crate::luminance::luma_u8;

/// Colour mode of a pixel buffer. Determines the channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    /// Single 8-bit luminance channel.
    Luminance,
    /// Three 8-bit channels: red, green, blue.
    Rgb,
    /// RGB followed by an 8-bit straight (non-premultiplied) alpha channel.
    Rgba,
}

impl ColorMode {
    /// Number of samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Luminance => 1,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    /// Number of colour (non-alpha) samples per pixel.
    #[inline]
    pub fn color_channels(self) -> usize {
        match self {
            ColorMode::Luminance => 1,
            ColorMode::Rgb | ColorMode::Rgba => 3,
        }
    }

    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::Rgba)
    }

    pub fn bits_per_pixel(self) -> u32 {
        self.channels() as u32 * 8
    }

    /// Band names in storage order, e.g. `"R,G,B,A"`.
    pub fn bands(self) -> &'static str {
        match self {
            ColorMode::Luminance => "L",
            ColorMode::Rgb => "R,G,B",
            ColorMode::Rgba => "R,G,B,A",
        }
    }

    /// Short tag used by loaders and the UI (`"L"`, `"RGB"`, `"RGBA"`).
    pub fn tag(self) -> &'static str {
        match self {
            ColorMode::Luminance => "L",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }

    /// Human-readable description of the mode.
    pub fn description(self) -> &'static str {
        match self {
            ColorMode::Luminance => "Grayscale (8-bit)",
            ColorMode::Rgb => "Color (RGB)",
            ColorMode::Rgba => "Color (RGB + alpha)",
        }
    }
}

impl FromStr for ColorMode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L" => Ok(ColorMode::Luminance),
            "RGB" => Ok(ColorMode::Rgb),
            "RGBA" => Ok(ColorMode::Rgba),
            other => Err(EditError::UnknownOperation(format!("color mode {other}"))),
        }
    }
}

/// How neighbourhood operations treat colour images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcessMode {
    /// Convert to luminance, process one plane, convert back to the source
    /// mode with the result replicated across the colour channels.
    #[default]
    Luminance,
    /// Process R, G and B independently.
    Rgb,
}

impl FromStr for ProcessMode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L" => Ok(ProcessMode::Luminance),
            "RGB" => Ok(ProcessMode::Rgb),
            other => Err(EditError::UnknownOperation(format!("process mode {other}"))),
        }
    }
}

/// An immutable 2D grid of 8-bit samples in one [`ColorMode`].
///
/// Invariant: `samples().len() == width * height * mode.channels()`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    mode: ColorMode,
    data: Arc<[u8]>,
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("mode", &self.mode)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Create a buffer from raw interleaved samples (row-major order).
    pub fn new(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(EditError::InvalidBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(width, height, mode, data))
    }

    /// Internal constructor for operations that build correctly sized storage.
    pub(crate) fn from_parts(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * mode.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            mode,
            data: data.into(),
        }
    }

    /// Create a buffer where every sample (alpha included) equals `value`.
    pub fn filled(width: u32, height: u32, mode: ColorMode, value: u8) -> Self {
        let len = width as usize * height as usize * mode.channels();
        Self::from_parts(width, height, mode, vec![value; len])
    }

    /// Create a buffer by calling `f(x, y, pixel)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mode: ColorMode, mut f: F) -> Self
    where
        F: FnMut(u32, u32, &mut [u8]),
    {
        let ch = mode.channels();
        let mut data = vec![0u8; width as usize * height as usize * ch];
        for (i, px) in data.chunks_exact_mut(ch).enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            f(x, y, px);
        }
        Self::from_parts(width, height, mode, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Interleaved samples in row-major order.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let ch = self.channels();
        let idx = (y as usize * self.width as usize + x as usize) * ch;
        &self.data[idx..idx + ch]
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy the samples out into an owned vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Convert to another colour mode.
    ///
    /// - L -> RGB(A) replicates the sample; added alpha is opaque
    /// - RGB(A) -> L uses BT.601 luminance
    /// - RGBA -> RGB drops alpha
    pub fn convert(&self, mode: ColorMode) -> PixelBuffer {
        if mode == self.mode {
            return self.clone();
        }

        let src_ch = self.channels();
        let dst_ch = mode.channels();
        let mut out = Vec::with_capacity(self.pixel_count() * dst_ch);

        for px in self.data.chunks_exact(src_ch) {
            let (r, g, b, a) = match self.mode {
                ColorMode::Luminance => (px[0], px[0], px[0], 255),
                ColorMode::Rgb => (px[0], px[1], px[2], 255),
                ColorMode::Rgba => (px[0], px[1], px[2], px[3]),
            };
            match mode {
                ColorMode::Luminance => out.push(luma_u8(r, g, b)),
                ColorMode::Rgb => out.extend_from_slice(&[r, g, b]),
                ColorMode::Rgba => out.extend_from_slice(&[r, g, b, a]),
            }
        }

        PixelBuffer::from_parts(self.width, self.height, mode, out)
    }

    /// Extract a single channel as a `width * height` plane.
    pub fn plane(&self, channel: usize) -> Vec<u8> {
        debug_assert!(channel < self.channels());
        self.data
            .chunks_exact(self.channels())
            .map(|px| px[channel])
            .collect()
    }

    /// Copy the alpha channel of `source` into this buffer.
    ///
    /// No-op unless both buffers carry alpha and share dimensions.
    pub(crate) fn with_alpha_from(self, source: &PixelBuffer) -> PixelBuffer {
        if !self.mode.has_alpha() || !source.mode.has_alpha() || self.dimensions() != source.dimensions() {
            return self;
        }
        let mut data = self.data.to_vec();
        for (dst, src) in data.chunks_exact_mut(4).zip(source.data.chunks_exact(4)) {
            dst[3] = src[3];
        }
        PixelBuffer::from_parts(self.width, self.height, self.mode, data)
    }

    /// Run a single-plane operation over the image according to `mode`.
    ///
    /// `op` receives a `width * height` plane plus the dimensions and must
    /// return a plane of the same length. Alpha is never passed to `op`;
    /// it is carried over from `self` unchanged.
    pub(crate) fn map_planes<F>(&self, mode: ProcessMode, op: F) -> PixelBuffer
    where
        F: Fn(&[u8], usize, usize) -> Vec<u8>,
    {
        let (w, h) = (self.width as usize, self.height as usize);

        if mode == ProcessMode::Luminance || self.mode == ColorMode::Luminance {
            let gray = self.convert(ColorMode::Luminance);
            let plane = op(gray.samples(), w, h);
            debug_assert_eq!(plane.len(), w * h);
            let processed = PixelBuffer::from_parts(self.width, self.height, ColorMode::Luminance, plane);
            return processed.convert(self.mode).with_alpha_from(self);
        }

        let ch = self.channels();
        let mut data = self.data.to_vec();
        for c in 0..self.mode.color_channels() {
            let plane = op(&self.plane(c), w, h);
            debug_assert_eq!(plane.len(), w * h);
            for (px, v) in data.chunks_exact_mut(ch).zip(plane) {
                px[c] = v;
            }
        }
        PixelBuffer::from_parts(self.width, self.height, self.mode, data)
    }

    /// Build a buffer from an `image` crate image.
    ///
    /// 8-bit gray, RGB and RGBA are taken as-is; any other layout is
    /// converted to RGBA when it carries alpha, RGB when it carries colour,
    /// and luminance otherwise.
    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        use image::DynamicImage;

        match image {
            DynamicImage::ImageLuma8(img) => {
                let (w, h) = img.dimensions();
                Self::from_parts(w, h, ColorMode::Luminance, img.into_raw())
            }
            DynamicImage::ImageRgb8(img) => {
                let (w, h) = img.dimensions();
                Self::from_parts(w, h, ColorMode::Rgb, img.into_raw())
            }
            DynamicImage::ImageRgba8(img) => {
                let (w, h) = img.dimensions();
                Self::from_parts(w, h, ColorMode::Rgba, img.into_raw())
            }
            other if other.color().has_alpha() => Self::from_dynamic(other.to_rgba8().into()),
            other if other.color().has_color() => Self::from_dynamic(other.to_rgb8().into()),
            other => Self::from_dynamic(other.to_luma8().into()),
        }
    }

    /// Convert to an `image` crate image for encoding.
    pub fn to_dynamic(&self) -> Option<image::DynamicImage> {
        use image::{DynamicImage, ImageBuffer};

        let (w, h) = self.dimensions();
        let raw = self.to_vec();
        let img = match self.mode {
            ColorMode::Luminance => DynamicImage::ImageLuma8(ImageBuffer::from_raw(w, h, raw)?),
            ColorMode::Rgb => DynamicImage::ImageRgb8(ImageBuffer::from_raw(w, h, raw)?),
            ColorMode::Rgba => DynamicImage::ImageRgba8(ImageBuffer::from_raw(w, h, raw)?),
        };
        Some(img)
    }
}

/// An image as handed over by the loader: pixels plus opaque metadata blobs.
///
/// The EXIF and ICC blobs are never parsed by the engine; they travel with
/// the session so the saver can write them back.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub buffer: PixelBuffer,
    pub exif: Option<Vec<u8>>,
    pub icc_profile: Option<Vec<u8>>,
    pub path: Option<String>,
    /// Size of the source file on disk, 0 when unknown.
    pub file_size: u64,
}

impl LoadedImage {
    /// Wrap a buffer that came without metadata.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            exif: None,
            icc_profile: None,
            path: None,
            file_size: 0,
        }
    }
}
