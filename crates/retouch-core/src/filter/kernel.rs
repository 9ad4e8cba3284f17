//! Convolution kernels and kernel synthesis.
//!
//! A [`Kernel`] always has odd dimensions so that its anchor is the exact
//! centre cell `(rows / 2, cols / 2)`. Every constructor enforces this.

use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};

/// Weights with an absolute value below this count as zero.
const ZERO_TOLERANCE: f64 = 1e-8;

/// Round a size up to the next odd value (0 becomes 1).
#[inline]
pub fn force_odd(n: usize) -> usize {
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// A dense matrix of floating-point weights with odd dimensions.
///
/// Serializes as a 2-D array of numbers (one inner array per row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<f64>>", try_from = "Vec<Vec<f64>>")]
pub struct Kernel {
    rows: usize,
    cols: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// An all-zero kernel. Even sizes are rounded up to the next odd size.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let rows = force_odd(rows);
        let cols = force_odd(cols);
        Self {
            rows,
            cols,
            weights: vec![0.0; rows * cols],
        }
    }

    /// A kernel with a single unit weight at the centre.
    pub fn identity(rows: usize, cols: usize) -> Self {
        let mut kernel = Self::zeros(rows, cols);
        let (cy, cx) = kernel.center();
        kernel.set(cy, cx, 1.0);
        kernel
    }

    /// Build a kernel from row vectors.
    ///
    /// Even dimensions are padded with a trailing zero row or column.
    /// Returns [`EditError::InvalidKernel`] for empty, ragged or non-finite
    /// input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(EditError::InvalidKernel("kernel has no weights".into()));
        }
        if let Some(i) = rows.iter().position(|row| row.len() != cols) {
            return Err(EditError::InvalidKernel(format!(
                "row {} has {} weights, expected {}",
                i,
                rows[i].len(),
                cols
            )));
        }
        if rows.iter().flatten().any(|w| !w.is_finite()) {
            return Err(EditError::InvalidKernel("weights must be finite".into()));
        }

        let mut kernel = Self::zeros(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            for (c, &w) in row.iter().enumerate() {
                kernel.set(r, c, w);
            }
        }
        Ok(kernel)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Anchor cell as `(row, col)`.
    pub fn center(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, weight: f64) {
        self.weights[row * self.cols + col] = weight;
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn is_all_zero(&self) -> bool {
        self.weights.iter().all(|w| w.abs() < ZERO_TOLERANCE)
    }

    /// Divide every weight by the kernel sum so a flat region keeps its value.
    ///
    /// Kernels whose sum is zero (edge detectors, emboss) are returned
    /// unchanged.
    pub fn normalized(&self) -> Self {
        let sum = self.sum();
        if sum.abs() < ZERO_TOLERANCE {
            return self.clone();
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            weights: self.weights.iter().map(|w| w / sum).collect(),
        }
    }

    /// Copy into a new size, keeping the overlapping top-left block.
    ///
    /// Used to fit a stored kernel to the size currently selected.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let mut out = Self::zeros(rows, cols);
        for r in 0..self.rows.min(out.rows) {
            for c in 0..self.cols.min(out.cols) {
                out.set(r, c, self.get(r, c));
            }
        }
        out
    }

    /// Replace an all-zero kernel with the identity of the same size.
    ///
    /// The flag is `true` when the replacement happened.
    pub(crate) fn or_identity(&self) -> (Kernel, bool) {
        if self.is_all_zero() {
            (Self::identity(self.rows, self.cols), true)
        } else {
            (self.clone(), false)
        }
    }

    /// Place a 3x3 block centred in a `rows x cols` kernel.
    ///
    /// Kernels smaller than 3 in a dimension receive the leading part of the
    /// block.
    fn fit_3x3(base: [[f64; 3]; 3], rows: usize, cols: usize) -> Self {
        let mut out = Self::zeros(rows, cols);
        let y0 = (out.rows / 2).saturating_sub(1);
        let x0 = (out.cols / 2).saturating_sub(1);
        let y1 = out.rows.min(y0 + 3);
        let x1 = out.cols.min(x0 + 3);
        for (by, y) in (y0..y1).enumerate() {
            for (bx, x) in (x0..x1).enumerate() {
                out.set(y, x, base[by][bx]);
            }
        }
        out
    }
}

impl From<Kernel> for Vec<Vec<f64>> {
    fn from(kernel: Kernel) -> Self {
        kernel.weights.chunks(kernel.cols).map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for Kernel {
    type Error = EditError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Kernel::from_rows(rows)
    }
}

const SHARPEN: [[f64; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];
const EMBOSS: [[f64; 3]; 3] = [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]];
const GAUSSIAN: [[f64; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// Fixed 3x3 Laplacian sharpening kernel.
pub fn sharpen_kernel() -> Kernel {
    Kernel::fit_3x3(SHARPEN, 3, 3)
}

/// Fixed 3x3 directional emboss kernel.
pub fn emboss_kernel() -> Kernel {
    Kernel::fit_3x3(EMBOSS, 3, 3)
}

/// Straight-line motion blur kernel.
///
/// Rasterizes `length` samples of a line through the centre of an
/// `L x L` kernel (L = `length` forced odd) at a clockwise angle, marks
/// every covered cell with 1 and normalizes by the number of marked cells.
/// A non-finite angle yields the identity.
pub fn motion_kernel(length: usize, angle_degrees: f64) -> Kernel {
    let size = force_odd(length);
    if !angle_degrees.is_finite() {
        log::debug!("motion angle {} is not finite, using identity", angle_degrees);
        return Kernel::identity(size, size);
    }
    let half = (size / 2) as i64;
    let mut kernel = Kernel::zeros(size, size);

    let theta = angle_degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let center = half as f64;

    for t in -half..=half {
        let row = (center + t as f64 * sin).round_ties_even() as i64;
        let col = (center + t as f64 * cos).round_ties_even() as i64;
        if (0..size as i64).contains(&row) && (0..size as i64).contains(&col) {
            kernel.set(row as usize, col as usize, 1.0);
        }
    }

    let marked = kernel.sum();
    if marked == 0.0 {
        return Kernel::identity(size, size);
    }
    kernel.normalized()
}

/// Built-in kernel presets offered alongside user presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelPreset {
    Identity,
    BoxBlur,
    Gaussian,
    Sharpen,
    Emboss,
    SobelX,
}

impl KernelPreset {
    pub const ALL: [KernelPreset; 6] = [
        KernelPreset::Identity,
        KernelPreset::BoxBlur,
        KernelPreset::Gaussian,
        KernelPreset::Sharpen,
        KernelPreset::Emboss,
        KernelPreset::SobelX,
    ];

    /// Display name; user presets may not reuse it.
    pub fn name(self) -> &'static str {
        match self {
            KernelPreset::Identity => "Identity",
            KernelPreset::BoxBlur => "Box blur",
            KernelPreset::Gaussian => "Gaussian",
            KernelPreset::Sharpen => "Sharpen",
            KernelPreset::Emboss => "Emboss",
            KernelPreset::SobelX => "Edge (Sobel X)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Build the preset at the requested size.
    ///
    /// Box blur fills the whole kernel; the 3x3 presets are centred.
    pub fn kernel(self, rows: usize, cols: usize) -> Kernel {
        match self {
            KernelPreset::Identity => Kernel::identity(rows, cols),
            KernelPreset::BoxBlur => {
                let mut k = Kernel::zeros(rows, cols);
                k.weights.fill(1.0);
                k
            }
            KernelPreset::Gaussian => Kernel::fit_3x3(GAUSSIAN, rows, cols),
            KernelPreset::Sharpen => Kernel::fit_3x3(SHARPEN, rows, cols),
            KernelPreset::Emboss => Kernel::fit_3x3(EMBOSS, rows, cols),
            KernelPreset::SobelX => Kernel::fit_3x3(SOBEL_X, rows, cols),
        }
    }
}
