//! Luminance calculation using ITU-R BT.709 coefficients.
//!
//! Device captures arrive as RGB(A) screenshots while the segmentation model
//! consumes a single channel; this module performs that collapse.

use crate::{Frame, ProcessError};

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate luminance from u8 RGB values (0 to 255).
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Collapse a frame to a single luminance channel.
///
/// | channels | interpretation | result            |
/// |----------|----------------|-------------------|
/// | 1        | gray           | copy              |
/// | 2        | gray + alpha   | gray channel      |
/// | 3        | RGB            | BT.709 luminance  |
/// | 4        | RGBA           | BT.709 luminance  |
///
/// # Errors
/// Returns [`ProcessError::ShapeMismatch`] for any other channel count.
pub fn to_grayscale(frame: &Frame<u8>) -> Result<Frame<u8>, ProcessError> {
    let channels = frame.channels();
    let samples: Vec<u8> = match channels {
        1 => return Ok(frame.clone()),
        2 => frame.samples().chunks_exact(2).map(|px| px[0]).collect(),
        3 | 4 => frame
            .samples()
            .chunks_exact(channels)
            .map(|px| calculate_luminance_u8(px[0], px[1], px[2]))
            .collect(),
        n => {
            return Err(ProcessError::shape(
                "1, 2, 3 or 4 channels",
                format!("{n} channels"),
            ))
        }
    };
    Frame::new(frame.width(), frame.height(), 1, samples)
}
