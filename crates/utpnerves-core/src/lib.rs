//! UTP Nerves Core - ultrasound frame preprocessing
//!
//! This crate prepares raw ultrasound-device captures for a nerve
//! segmentation model and turns the model's masks back into usable regions:
//! percentile white balance, area resizing, tensor packaging, small-blob
//! removal, bounding rectangles and region cropping.
//!
//! Every operation is a pure function over in-memory frames.

pub mod adjustments;
pub mod error;
pub mod frame;
pub mod histogram;
pub mod luminance;
pub mod mask;
pub mod pipeline;
pub mod tensor;
pub mod transform;

pub use adjustments::{
    adjust_contrast, clamp_intensity, white_balance, white_balance_with, ContrastStretch,
};
pub use error::ProcessError;
pub use frame::{Frame, Sample};
pub use mask::{
    bounding_boxes, draw_bounding_rects, remove_small_regions, square_regions, BoundingBox,
    Connectivity, Mask, RectStyle,
};
pub use pipeline::{clean_prediction, prepare_model_input, restore_mask};
pub use tensor::{mask_from_prediction, to_model_tensor, ModelTensor};
pub use transform::{crop, crop_to_region, resize_area};

use serde::{Deserialize, Serialize};

/// Tunable constants of the preprocessing and post-processing steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Model input height in pixels
    pub target_rows: u32,
    /// Model input width in pixels
    pub target_cols: u32,
    /// Blobs with fewer pixels than this are removed from predictions
    pub min_region_area: usize,
    /// White balance lower percentile (0 to 100)
    pub low_percentile: f64,
    /// White balance upper percentile (0 to 100)
    pub high_percentile: f64,
    /// Adjacency used to group blobs
    pub connectivity: Connectivity,
    /// Prediction values above this are foreground
    pub prediction_threshold: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            target_rows: 180,
            target_cols: 320,
            min_region_area: mask::regions::DEFAULT_MIN_REGION_AREA,
            low_percentile: adjustments::DEFAULT_LOW_PERCENTILE,
            high_percentile: adjustments::DEFAULT_HIGH_PERCENTILE,
            connectivity: Connectivity::Eight,
            prediction_threshold: 0.5,
        }
    }
}

impl SegmentationConfig {
    /// Create a new SegmentationConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every field against its valid domain
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.target_rows == 0 || self.target_cols == 0 {
            return Err(ProcessError::InvalidConfig(format!(
                "target size must be non-zero, got {}x{}",
                self.target_rows, self.target_cols
            )));
        }
        let (lo, hi) = (self.low_percentile, self.high_percentile);
        if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo >= hi {
            return Err(ProcessError::InvalidConfig(format!(
                "percentiles must satisfy 0 <= low < high <= 100, got {lo} and {hi}"
            )));
        }
        if !self.prediction_threshold.is_finite() {
            return Err(ProcessError::InvalidConfig(format!(
                "prediction threshold must be finite, got {}",
                self.prediction_threshold
            )));
        }
        Ok(())
    }
}
