//! Structuring elements.

use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};
use crate::filter::force_odd;

/// Built-in structuring element shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementShape {
    Square,
    Cross,
    Ellipse,
    Diamond,
    Center,
}

impl ElementShape {
    pub const ALL: [ElementShape; 5] = [
        ElementShape::Square,
        ElementShape::Cross,
        ElementShape::Ellipse,
        ElementShape::Diamond,
        ElementShape::Center,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementShape::Square => "Square",
            ElementShape::Cross => "Cross",
            ElementShape::Ellipse => "Ellipse",
            ElementShape::Diamond => "Diamond",
            ElementShape::Center => "Center",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Boolean neighbourhood mask with odd dimensions.
///
/// Serializes as a 2-D array of 0/1 numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<u8>>", try_from = "Vec<Vec<u8>>")]
pub struct StructuringElement {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl StructuringElement {
    /// An empty element. Even sizes are rounded up to the next odd size.
    pub fn empty(rows: usize, cols: usize) -> Self {
        let rows = force_odd(rows);
        let cols = force_odd(cols);
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Build one of the preset shapes at the given size.
    pub fn shape(shape: ElementShape, rows: usize, cols: usize) -> Self {
        let mut se = Self::empty(rows, cols);
        let (cy, cx) = se.center();
        let (r, c) = (se.rows, se.cols);

        match shape {
            ElementShape::Square => se.cells.fill(true),
            ElementShape::Cross => {
                for x in 0..c {
                    se.set(cy, x, true);
                }
                for y in 0..r {
                    se.set(y, cx, true);
                }
            }
            ElementShape::Ellipse => {
                let ry = (r / 2).max(1) as f64;
                let rx = (c / 2).max(1) as f64;
                for y in 0..r {
                    for x in 0..c {
                        let dy = y as f64 - cy as f64;
                        let dx = x as f64 - cx as f64;
                        if dy * dy / (ry * ry) + dx * dx / (rx * rx) <= 1.0 {
                            se.set(y, x, true);
                        }
                    }
                }
            }
            ElementShape::Diamond => {
                let reach = r.max(c) / 2;
                for y in 0..r {
                    for x in 0..c {
                        if y.abs_diff(cy) + x.abs_diff(cx) <= reach {
                            se.set(y, x, true);
                        }
                    }
                }
            }
            ElementShape::Center => se.set(cy, cx, true),
        }
        se
    }

    /// A full square element.
    pub fn square(size: usize) -> Self {
        Self::shape(ElementShape::Square, size, size)
    }

    /// Build from rows of 0/1 values; any non-zero value marks the cell.
    ///
    /// Even dimensions are padded with a trailing empty row or column.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(EditError::InvalidKernel("structuring element has no cells".into()));
        }
        if let Some(i) = rows.iter().position(|row| row.len() != cols) {
            return Err(EditError::InvalidKernel(format!(
                "row {} has {} cells, expected {}",
                i,
                rows[i].len(),
                cols
            )));
        }

        let mut se = Self::empty(rows.len(), cols);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                se.set(y, x, v != 0);
            }
        }
        Ok(se)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn center(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        self.cells[row * self.cols + col] = on;
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Copy into a new size, keeping the overlapping top-left block.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let mut out = Self::empty(rows, cols);
        for y in 0..self.rows.min(out.rows) {
            for x in 0..self.cols.min(out.cols) {
                out.set(y, x, self.get(y, x));
            }
        }
        out
    }

    /// Offsets `(dy, dx)` of the marked cells relative to the centre.
    pub(crate) fn offsets(&self) -> Vec<(i64, i64)> {
        let (cy, cx) = self.center();
        let mut out = Vec::with_capacity(self.count());
        for y in 0..self.rows {
            for x in 0..self.cols {
                if self.get(y, x) {
                    out.push((y as i64 - cy as i64, x as i64 - cx as i64));
                }
            }
        }
        out
    }

    /// Force the centre cell on when nothing is marked.
    ///
    /// The flag is `true` when the replacement happened.
    pub(crate) fn or_center(&self) -> (StructuringElement, bool) {
        if self.is_empty() {
            (Self::shape(ElementShape::Center, self.rows, self.cols), true)
        } else {
            (self.clone(), false)
        }
    }
}

impl From<StructuringElement> for Vec<Vec<u8>> {
    fn from(se: StructuringElement) -> Self {
        se.cells
            .chunks(se.cols)
            .map(|row| row.iter().map(|&c| c as u8).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for StructuringElement {
    type Error = EditError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        StructuringElement::from_rows(rows)
    }
}
