//! Error type shared by every preprocessing and post-processing operation.

use thiserror::Error;

/// Errors raised by frame transforms.
///
/// All variants describe local, recoverable conditions: the caller decides
/// whether to skip the frame or substitute a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// The input intensity range of a contrast stretch has zero width.
    #[error("Degenerate intensity range: low {low} and high {high} leave nothing to stretch")]
    InvalidRange { low: f32, high: f32 },

    /// Gamma must be finite and strictly positive.
    #[error("Invalid gamma: {0}")]
    InvalidGamma(f32),

    /// The mask has no usable region (missing, ambiguous or malformed contour).
    #[error("No region found: {0}")]
    NoRegionFound(String),

    /// An array has the wrong rank, channel count or extent for the operation.
    #[error("Shape mismatch: expected {expected}, got {found}")]
    ShapeMismatch { expected: String, found: String },

    /// A configuration value is out of its valid domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProcessError {
    pub(crate) fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ProcessError::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
