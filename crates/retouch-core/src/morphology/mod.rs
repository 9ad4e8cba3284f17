//! Morphological operations with arbitrary structuring elements.
//!
//! Erosion takes the minimum and dilation the maximum over the marked
//! neighbourhood. Neighbours that fall outside the image are ignored, so
//! borders never pull values towards black or white.
//!
//! The compound operations are built from erosion and dilation. For these,
//! `iterations` repeats each inner erosion or dilation, not the compound as
//! a whole: an opening with 2 iterations is `dilate^2(erode^2(x))`.

mod element;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, ProcessMode};
use crate::error::{EditError, Result};
use crate::{Applied, Correction};

pub use element::{ElementShape, StructuringElement};

/// Morphological operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphOp {
    Erode,
    Dilate,
    /// `dilate(erode(x))`
    Open,
    /// `erode(dilate(x))`
    Close,
    /// `dilate(x) - erode(x)`
    Gradient,
    /// `x - open(x)`
    #[serde(alias = "top-hat")]
    TopHat,
    /// `close(x) - x`
    #[serde(alias = "black-hat")]
    BlackHat,
}

impl MorphOp {
    pub const ALL: [MorphOp; 7] = [
        MorphOp::Erode,
        MorphOp::Dilate,
        MorphOp::Open,
        MorphOp::Close,
        MorphOp::Gradient,
        MorphOp::TopHat,
        MorphOp::BlackHat,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            MorphOp::Erode => "erode",
            MorphOp::Dilate => "dilate",
            MorphOp::Open => "open",
            MorphOp::Close => "close",
            MorphOp::Gradient => "gradient",
            MorphOp::TopHat => "tophat",
            MorphOp::BlackHat => "blackhat",
        }
    }
}

impl fmt::Display for MorphOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MorphOp {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erode" => Ok(MorphOp::Erode),
            "dilate" => Ok(MorphOp::Dilate),
            "open" => Ok(MorphOp::Open),
            "close" => Ok(MorphOp::Close),
            "gradient" => Ok(MorphOp::Gradient),
            "tophat" | "top-hat" => Ok(MorphOp::TopHat),
            "blackhat" | "black-hat" => Ok(MorphOp::BlackHat),
            _ => Err(EditError::UnknownOperation(format!("morphology '{}'", s))),
        }
    }
}

/// Apply a morphological operation.
///
/// An empty structuring element is replaced by a single centre cell and
/// reported as [`Correction::DegenerateElement`]. `iterations == 0` is
/// treated as 1.
pub fn morphology_apply(
    image: &PixelBuffer,
    op: MorphOp,
    element: &StructuringElement,
    iterations: u32,
    mode: ProcessMode,
) -> Applied {
    let (element, replaced) = element.or_center();
    if replaced {
        log::warn!(
            "empty {}x{} structuring element replaced with centre cell",
            element.rows(),
            element.cols()
        );
    }
    let iterations = iterations.max(1);
    let offsets = element.offsets();

    let out = image.map_planes(mode, |plane, w, h| {
        let erode = |p: &[u8]| repeat(p, iterations, |q| extremum(q, w, h, &offsets, Extremum::Min));
        let dilate = |p: &[u8]| repeat(p, iterations, |q| extremum(q, w, h, &offsets, Extremum::Max));

        match op {
            MorphOp::Erode => erode(plane),
            MorphOp::Dilate => dilate(plane),
            MorphOp::Open => dilate(&erode(plane)),
            MorphOp::Close => erode(&dilate(plane)),
            MorphOp::Gradient => saturating_diff(&dilate(plane), &erode(plane)),
            MorphOp::TopHat => saturating_diff(plane, &dilate(&erode(plane))),
            MorphOp::BlackHat => saturating_diff(&erode(&dilate(plane)), plane),
        }
    });

    if replaced {
        Applied::corrected(out, Correction::DegenerateElement)
    } else {
        Applied::clean(out)
    }
}

#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

fn repeat<F>(plane: &[u8], times: u32, step: F) -> Vec<u8>
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    let mut current = step(plane);
    for _ in 1..times {
        current = step(&current);
    }
    current
}

fn extremum(src: &[u8], width: usize, height: usize, offsets: &[(i64, i64)], kind: Extremum) -> Vec<u8> {
    let (w, h) = (width as i64, height as i64);
    let mut dst = Vec::with_capacity(src.len());

    for y in 0..h {
        for x in 0..w {
            let mut acc = match kind {
                Extremum::Min => u8::MAX,
                Extremum::Max => u8::MIN,
            };
            for &(dy, dx) in offsets {
                let (sy, sx) = (y + dy, x + dx);
                if sy < 0 || sx < 0 || sy >= h || sx >= w {
                    continue;
                }
                let v = src[(sy * w + sx) as usize];
                acc = match kind {
                    Extremum::Min => acc.min(v),
                    Extremum::Max => acc.max(v),
                };
            }
            dst.push(acc);
        }
    }
    dst
}

fn saturating_diff(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(&x, &y)| x.saturating_sub(y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ColorMode;

    fn single_bright(mode: ColorMode) -> PixelBuffer {
        PixelBuffer::from_fn(3, 3, mode, |x, y, px| {
            let v = if x == 1 && y == 1 { 255 } else { 0 };
            px.fill(v);
        })
    }

    #[test]
    fn test_erode_extinguishes_single_pixel() {
        let img = single_bright(ColorMode::Luminance);
        let out = morphology_apply(&img, MorphOp::Erode, &StructuringElement::square(3), 1, ProcessMode::Luminance);
        assert!(out.image.samples().iter().all(|&v| v == 0));
        assert_eq!(out.correction, None);
    }

    #[test]
    fn test_dilate_spreads_single_pixel() {
        let img = single_bright(ColorMode::Luminance);
        let out = morphology_apply(&img, MorphOp::Dilate, &StructuringElement::square(3), 1, ProcessMode::Luminance);
        assert!(out.image.samples().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_dilate_rgb_per_channel() {
        let img = PixelBuffer::from_fn(3, 3, ColorMode::Rgb, |x, y, px| {
            px.copy_from_slice(&[if x == 0 && y == 0 { 200 } else { 0 }, 0, if x == 2 && y == 2 { 100 } else { 0 }]);
        });
        let out = morphology_apply(&img, MorphOp::Dilate, &StructuringElement::square(3), 1, ProcessMode::Rgb);
        assert_eq!(out.image.pixel(1, 1), &[200, 0, 100]);
        assert_eq!(out.image.pixel(0, 0), &[200, 0, 0]);
        assert_eq!(out.image.pixel(2, 2), &[0, 0, 100]);
    }

    #[test]
    fn test_border_neighbours_ignored() {
        // Erosion of a flat image stays flat at the border
        let img = PixelBuffer::filled(4, 4, ColorMode::Luminance, 180);
        for op in MorphOp::ALL {
            let out = morphology_apply(&img, op, &StructuringElement::square(3), 2, ProcessMode::Luminance);
            let expected = match op {
                MorphOp::Gradient | MorphOp::TopHat | MorphOp::BlackHat => 0,
                _ => 180,
            };
            assert!(
                out.image.samples().iter().all(|&v| v == expected),
                "{} changed a flat image",
                op
            );
        }
    }

    #[test]
    fn test_iterations_grow_dilation() {
        let img = PixelBuffer::from_fn(7, 1, ColorMode::Luminance, |x, _, px| px[0] = if x == 3 { 9 } else { 0 });
        let se = StructuringElement::from_rows(vec![vec![1, 1, 1]]).unwrap();
        let once = morphology_apply(&img, MorphOp::Dilate, &se, 1, ProcessMode::Luminance);
        assert_eq!(once.image.samples(), &[0, 0, 9, 9, 9, 0, 0]);
        let twice = morphology_apply(&img, MorphOp::Dilate, &se, 2, ProcessMode::Luminance);
        assert_eq!(twice.image.samples(), &[0, 9, 9, 9, 9, 9, 0]);
        let zero = morphology_apply(&img, MorphOp::Dilate, &se, 0, ProcessMode::Luminance);
        assert_eq!(zero.image, once.image);
    }

    #[test]
    fn test_open_removes_small_features() {
        let img = PixelBuffer::from_fn(9, 1, ColorMode::Luminance, |x, _, px| {
            // A 1-pixel spike and a 4-pixel plateau
            px[0] = if x == 1 || (4..8).contains(&x) { 100 } else { 0 };
        });
        let se = StructuringElement::from_rows(vec![vec![1, 1, 1]]).unwrap();
        let out = morphology_apply(&img, MorphOp::Open, &se, 1, ProcessMode::Luminance);
        assert_eq!(out.image.samples(), &[0, 0, 0, 0, 100, 100, 100, 100, 0]);

        let hat = morphology_apply(&img, MorphOp::TopHat, &se, 1, ProcessMode::Luminance);
        assert_eq!(hat.image.samples(), &[0, 100, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_close_fills_small_gaps() {
        let img = PixelBuffer::from_fn(7, 1, ColorMode::Luminance, |x, _, px| px[0] = if x == 3 { 0 } else { 50 });
        let se = StructuringElement::from_rows(vec![vec![1, 1, 1]]).unwrap();
        let out = morphology_apply(&img, MorphOp::Close, &se, 1, ProcessMode::Luminance);
        assert!(out.image.samples().iter().all(|&v| v == 50));

        let hat = morphology_apply(&img, MorphOp::BlackHat, &se, 1, ProcessMode::Luminance);
        assert_eq!(hat.image.samples(), &[0, 0, 0, 50, 0, 0, 0]);
    }

    #[test]
    fn test_gradient_marks_edges() {
        let img = PixelBuffer::from_fn(6, 1, ColorMode::Luminance, |x, _, px| px[0] = if x < 3 { 0 } else { 80 });
        let se = StructuringElement::from_rows(vec![vec![1, 1, 1]]).unwrap();
        let out = morphology_apply(&img, MorphOp::Gradient, &se, 1, ProcessMode::Luminance);
        assert_eq!(out.image.samples(), &[0, 0, 80, 80, 0, 0]);
    }

    #[test]
    fn test_compound_iterations_apply_to_inner_steps() {
        // Opening with 2 iterations is dilate^2(erode^2(x)), which removes a
        // 4-wide plateau that a single opening keeps
        let img = PixelBuffer::from_fn(10, 1, ColorMode::Luminance, |x, _, px| {
            px[0] = if (3..7).contains(&x) { 60 } else { 0 };
        });
        let se = StructuringElement::from_rows(vec![vec![1, 1, 1]]).unwrap();
        let once = morphology_apply(&img, MorphOp::Open, &se, 1, ProcessMode::Luminance);
        assert_eq!(once.image, img);
        let twice = morphology_apply(&img, MorphOp::Open, &se, 2, ProcessMode::Luminance);
        assert!(twice.image.samples().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_empty_element_corrected() {
        let img = single_bright(ColorMode::Luminance);
        let out = morphology_apply(&img, MorphOp::Erode, &StructuringElement::empty(3, 3), 1, ProcessMode::Luminance);
        assert_eq!(out.correction, Some(Correction::DegenerateElement));
        assert_eq!(out.image, img);
    }

    #[test]
    fn test_alpha_preserved() {
        let img = PixelBuffer::from_fn(3, 3, ColorMode::Rgba, |x, y, px| {
            px.copy_from_slice(&[(x * 100) as u8, (y * 100) as u8, 0, (x * 10 + y) as u8]);
        });
        let out = morphology_apply(&img, MorphOp::Dilate, &StructuringElement::square(3), 1, ProcessMode::Luminance);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(out.image.pixel(x, y)[3], img.pixel(x, y)[3]);
            }
        }
    }

    #[test]
    fn test_morph_op_from_str() {
        assert_eq!("erode".parse::<MorphOp>().unwrap(), MorphOp::Erode);
        assert_eq!("top-hat".parse::<MorphOp>().unwrap(), MorphOp::TopHat);
        assert_eq!("tophat".parse::<MorphOp>().unwrap(), MorphOp::TopHat);
        assert_eq!("BLACK-HAT".parse::<MorphOp>().unwrap(), MorphOp::BlackHat);
        for op in MorphOp::ALL {
            assert_eq!(op.tag().parse::<MorphOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_morph_op_is_error() {
        let err = "skeletonize".parse::<MorphOp>().unwrap_err();
        assert!(matches!(err, EditError::UnknownOperation(_)));
        assert!(err.to_string().contains("skeletonize"));
    }

    #[test]
    fn test_morph_op_serde() {
        assert_eq!(serde_json::to_string(&MorphOp::TopHat).unwrap(), "\"tophat\"");
        let op: MorphOp = serde_json::from_str("\"black-hat\"").unwrap();
        assert_eq!(op, MorphOp::BlackHat);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::ColorMode;
    use proptest::prelude::*;

    proptest! {
        /// Property: erosion never brightens and dilation never darkens.
        #[test]
        fn prop_erode_le_input_le_dilate(
            data in prop::collection::vec(any::<u8>(), 25),
            size in 1usize..4,
        ) {
            let img = PixelBuffer::new(5, 5, ColorMode::Luminance, data).unwrap();
            let se = StructuringElement::square(size);
            let eroded = morphology_apply(&img, MorphOp::Erode, &se, 1, ProcessMode::Luminance).image;
            let dilated = morphology_apply(&img, MorphOp::Dilate, &se, 1, ProcessMode::Luminance).image;
            for i in 0..25 {
                prop_assert!(eroded.samples()[i] <= img.samples()[i]);
                prop_assert!(img.samples()[i] <= dilated.samples()[i]);
            }
        }

        /// Property: opening is anti-extensive, closing is extensive.
        #[test]
        fn prop_open_le_input_le_close(data in prop::collection::vec(any::<u8>(), 36)) {
            let img = PixelBuffer::new(6, 6, ColorMode::Luminance, data).unwrap();
            let se = StructuringElement::shape(ElementShape::Cross, 3, 3);
            let opened = morphology_apply(&img, MorphOp::Open, &se, 1, ProcessMode::Luminance).image;
            let closed = morphology_apply(&img, MorphOp::Close, &se, 1, ProcessMode::Luminance).image;
            for i in 0..36 {
                prop_assert!(opened.samples()[i] <= img.samples()[i]);
                prop_assert!(img.samples()[i] <= closed.samples()[i]);
            }
        }
    }
}
