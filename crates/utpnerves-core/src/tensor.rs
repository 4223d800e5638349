//! Conversion between frames and the segmentation model's tensor layout.
//!
//! The model takes and returns `NHWC` tensors with a batch of one and a
//! single channel: shape `(1, H, W, 1)`, values in `[0, 1]`.

use ndarray::{Array4, ArrayView4};
use tracing::debug;

use crate::mask::Mask;
use crate::{Frame, ProcessError};

/// Model input/output tensor, shape `(1, H, W, 1)`.
pub type ModelTensor = Array4<f32>;

/// Package a single-channel 8-bit frame as a model input tensor.
///
/// Adds the batch and channel axes and rescales `[0, 255]` to `[0, 1]`.
/// No resizing or cropping happens here.
///
/// # Errors
/// Returns [`ProcessError::ShapeMismatch`] if the frame has more than one channel.
pub fn to_model_tensor(frame: &Frame<u8>) -> Result<ModelTensor, ProcessError> {
    frame.ensure_single_channel()?;
    let (rows, cols, _) = frame.shape();
    debug!(rows, cols, "packaging frame as model tensor");

    let data: Vec<f32> = frame.samples().iter().map(|&v| v as f32 / 255.0).collect();
    Array4::from_shape_vec((1, rows, cols, 1), data)
        .map_err(|e| ProcessError::shape(format!("(1, {rows}, {cols}, 1) tensor"), e.to_string()))
}

/// Threshold a `(1, H, W, 1)` prediction into a mask.
///
/// Values strictly above `threshold` are foreground.
///
/// # Errors
/// Returns [`ProcessError::ShapeMismatch`] if the batch or channel axis is not 1.
pub fn mask_from_prediction(
    prediction: ArrayView4<f32>,
    threshold: f32,
) -> Result<Mask, ProcessError> {
    let &[batch, rows, cols, channels] = prediction.shape() else {
        return Err(ProcessError::shape("rank-4 tensor", "other rank"));
    };
    if batch != 1 || channels != 1 {
        return Err(ProcessError::shape(
            "(1, H, W, 1) prediction",
            format!("({batch}, {rows}, {cols}, {channels})"),
        ));
    }

    Ok(Mask::from_fn(cols as u32, rows as u32, |x, y| {
        prediction[[0, y as usize, x as usize, 0]] > threshold
    }))
}
