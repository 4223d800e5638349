//! End-to-end helpers around the segmentation model.
//!
//! ## Flow
//! 1. [`prepare_model_input`]: white balance, grayscale, resize, tensor
//! 2. model inference (external)
//! 3. [`clean_prediction`]: threshold, drop small blobs, square regions
//! 4. [`restore_mask`]: scale the mask back to capture resolution

use tracing::{debug, instrument};

use crate::adjustments::white_balance_with;
use crate::luminance::to_grayscale;
use crate::mask::{remove_small_regions, square_regions, Mask};
use crate::tensor::{mask_from_prediction, to_model_tensor, ModelTensor};
use crate::transform::resize_area;
use crate::{Frame, ProcessError, SegmentationConfig};

/// Turn a raw device capture into the model's input tensor.
///
/// # Arguments
/// * `capture` - 8-bit frame of any size, 1 to 4 channels
/// * `config` - Percentiles and target size
///
/// # Returns
/// A `(1, target_rows, target_cols, 1)` tensor with values in `[0, 1]`.
///
/// # Errors
/// * [`ProcessError::InvalidConfig`] if the configuration does not validate
/// * [`ProcessError::InvalidRange`] for a constant capture
/// * [`ProcessError::ShapeMismatch`] for an empty capture or unknown channel layout
#[instrument(level = "debug", skip_all, fields(rows = capture.height(), cols = capture.width()))]
pub fn prepare_model_input(
    capture: &Frame<u8>,
    config: &SegmentationConfig,
) -> Result<ModelTensor, ProcessError> {
    config.validate()?;

    let balanced = white_balance_with(capture, config.low_percentile, config.high_percentile)?;
    let gray = to_grayscale(&balanced)?;
    let resized = resize_area(&gray, config.target_rows, config.target_cols)?;
    to_model_tensor(&resized)
}

/// Post-process a model prediction into a rectangle mask.
///
/// Thresholds the prediction, removes blobs smaller than
/// `config.min_region_area` and replaces each survivor with its filled
/// bounding rectangle.
#[instrument(level = "debug", skip_all)]
pub fn clean_prediction(
    prediction: &ModelTensor,
    config: &SegmentationConfig,
) -> Result<Mask, ProcessError> {
    config.validate()?;

    let raw = mask_from_prediction(prediction.view(), config.prediction_threshold)?;
    let kept = remove_small_regions(&raw, config.min_region_area, config.connectivity);
    debug!(raw_area = raw.area(), kept_area = kept.area(), "prediction cleaned");
    Ok(square_regions(&kept))
}

/// Coverage at or above this counts as a whole foreground pixel.
const FULL_COVERAGE: f32 = 1.0 - 1e-4;

/// Scale a mask back to `rows × cols` for comparison with the original capture.
///
/// Only pixels whose footprint lies entirely inside a region stay foreground;
/// partially covered pixels at region borders are truncated to background.
pub fn restore_mask(mask: &Mask, rows: u32, cols: u32) -> Result<Mask, ProcessError> {
    let coverage = resize_area(&mask.to_frame(), rows, cols)?;
    Ok(Mask::from_fn(cols, rows, |x, y| coverage.get(x, y, 0) >= FULL_COVERAGE))
}
