//! Intensity adjustments: clamping, gamma-corrected contrast stretch and
//! percentile white balance.
//!
//! ## Stretch formula
//!
//! ```text
//! out = low_out + (high_out - low_out) * ((in - low_in) / (high_in - low_in)) ^ gamma
//! ```
//!
//! The result is scaled by 255, rounded, clamped to `[0, 255]` and stored
//! as `u8`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::histogram::SampleHistogram;
use crate::{Frame, ProcessError};

/// Default lower percentile for white balance.
pub const DEFAULT_LOW_PERCENTILE: f64 = 1.0;

/// Default upper percentile for white balance.
pub const DEFAULT_HIGH_PERCENTILE: f64 = 99.0;

/// Clamp every sample to the closed range `[0, 255]`.
///
/// Works for any sample type that can represent the bounds. Samples already
/// in range are left untouched. The frame is modified in place and returned.
///
/// # Example
/// ```
/// use utpnerves_core::{Frame, adjustments::clamp_intensity};
///
/// let frame = Frame::new(3, 1, 1, vec![-4.0f32, 12.5, 300.0]).unwrap();
/// let clamped = clamp_intensity(frame);
/// assert_eq!(clamped.samples(), &[0.0, 12.5, 255.0]);
/// ```
pub fn clamp_intensity<T>(mut frame: Frame<T>) -> Frame<T>
where
    T: Copy + PartialOrd + From<u8>,
{
    let lower = T::from(0);
    let upper = T::from(255);
    for sample in frame.samples_mut() {
        if *sample > upper {
            *sample = upper;
        } else if *sample < lower {
            *sample = lower;
        }
    }
    frame
}

/// Parameters of a gamma-corrected linear contrast stretch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastStretch {
    /// Input value mapped to `low_out` (typically 0.0 to 1.0).
    pub low_in: f32,
    /// Input value mapped to `high_out` (typically 0.0 to 1.0).
    pub high_in: f32,
    /// Output floor (0.0 to 1.0).
    pub low_out: f32,
    /// Output ceiling (0.0 to 1.0).
    pub high_out: f32,
    /// Curve exponent; 1.0 is linear.
    pub gamma: f32,
}

impl Default for ContrastStretch {
    fn default() -> Self {
        Self::identity()
    }
}

impl ContrastStretch {
    pub fn new(low_in: f32, high_in: f32, low_out: f32, high_out: f32, gamma: f32) -> Self {
        Self {
            low_in,
            high_in,
            low_out,
            high_out,
            gamma,
        }
    }

    /// Linear stretch from `[low_in, high_in]` onto the full output range.
    pub fn linear(low_in: f32, high_in: f32) -> Self {
        Self::new(low_in, high_in, 0.0, 1.0, 1.0)
    }

    /// Map `[0, 1]` onto `[0, 1]` unchanged.
    pub fn identity() -> Self {
        Self::linear(0.0, 1.0)
    }

    fn validate(&self) -> Result<(), ProcessError> {
        let span = self.high_in - self.low_in;
        if span == 0.0 || !span.is_finite() {
            return Err(ProcessError::InvalidRange {
                low: self.low_in,
                high: self.high_in,
            });
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(ProcessError::InvalidGamma(self.gamma));
        }
        Ok(())
    }
}

/// Apply a contrast stretch to a normalized float frame.
///
/// # Arguments
/// * `frame` - Samples nominally in `[0, 1]`, any channel count
/// * `stretch` - Input/output bounds and gamma
///
/// # Returns
/// An 8-bit frame of the same shape.
///
/// # Errors
/// * [`ProcessError::InvalidRange`] if `high_in == low_in`
/// * [`ProcessError::InvalidGamma`] if gamma is not a positive finite number
pub fn adjust_contrast(
    frame: &Frame<f32>,
    stretch: &ContrastStretch,
) -> Result<Frame<u8>, ProcessError> {
    stretch.validate()?;

    let low_in = stretch.low_in as f64;
    let span = (stretch.high_in - stretch.low_in) as f64;
    let low_out = stretch.low_out as f64;
    let out_span = (stretch.high_out - stretch.low_out) as f64;
    let gamma = stretch.gamma as f64;

    let scaled = frame.map(|v| {
        let t = (v as f64 - low_in) / span;
        // Fractional powers of a negative base are undefined; pin those to low_out.
        let shaped = if gamma == 1.0 { t } else { t.max(0.0).powf(gamma) };
        (255.0 * (low_out + out_span * shaped)).round()
    });

    Ok(clamp_intensity(scaled).map(|v| v as u8))
}

/// Percentile white balance with the default 1st/99th percentiles.
///
/// See [`white_balance_with`].
pub fn white_balance(frame: &Frame<u8>) -> Result<Frame<u8>, ProcessError> {
    white_balance_with(frame, DEFAULT_LOW_PERCENTILE, DEFAULT_HIGH_PERCENTILE)
}

/// Stretch a frame so its `low_pct` and `high_pct` percentiles map to 0 and 255.
///
/// Percentiles are taken across every sample of every channel, so speckle
/// and saturated overlays below/above the cut-offs do not drive the stretch.
///
/// # Errors
/// * [`ProcessError::ShapeMismatch`] for an empty frame
/// * [`ProcessError::InvalidConfig`] for percentiles outside `0 <= low < high <= 100`
/// * [`ProcessError::InvalidRange`] when both percentiles coincide (e.g. a constant frame)
pub fn white_balance_with(
    frame: &Frame<u8>,
    low_pct: f64,
    high_pct: f64,
) -> Result<Frame<u8>, ProcessError> {
    let in_domain = (0.0..=100.0).contains(&low_pct) && (0.0..=100.0).contains(&high_pct);
    if !in_domain || low_pct >= high_pct {
        return Err(ProcessError::InvalidConfig(format!(
            "percentiles must satisfy 0 <= low < high <= 100, got {low_pct} and {high_pct}"
        )));
    }

    let hist = SampleHistogram::from_samples(frame.samples());
    let (Some(low), Some(high)) = (hist.percentile(low_pct), hist.percentile(high_pct)) else {
        return Err(ProcessError::shape("non-empty frame", "0 samples"));
    };

    let low_in = (low / 255.0) as f32;
    let high_in = (high / 255.0) as f32;
    debug!(low_pct, high_pct, low_in, high_in, "white balance percentiles");

    adjust_contrast(&frame.to_unit_f32(), &ContrastStretch::linear(low_in, high_in))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
