//! Geometric frame transforms: area resize and region cropping.
//!
//! # Coordinate System
//!
//! - Sizes are given as `(rows, cols)` to match the model's `H × W` layout
//! - Crop rectangles are in pixel coordinates with the origin top-left

mod crop;
mod resize;

pub use crop::{crop, crop_to_region};
pub use resize::resize_area;
