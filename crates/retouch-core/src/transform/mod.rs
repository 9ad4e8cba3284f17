//! Geometric transforms: flips, exact quarter turns and arbitrary rotation.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Origin is the top-left corner, y grows downwards
//! - Flips and quarter turns are lossless pixel permutations

mod flip;
mod rotation;

pub use flip::{flip_horizontal, flip_vertical, rotate180, rotate90_ccw, rotate90_cw};
pub use rotation::{compute_rotated_bounds, rotate};
