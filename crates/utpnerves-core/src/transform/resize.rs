//! Area-averaging resize.
//!
//! Each destination pixel covers a footprint of `src / dst` source pixels
//! along each axis; its value is the mean of the source pixels under that
//! footprint, weighted by how much of each one is covered. Downscaling
//! averages whole blocks, upscaling replicates pixels and blends only
//! across source boundaries.
//!
//! The filter is separable, so rows are resampled first and columns second.

use tracing::debug;

use crate::frame::Sample;
use crate::{Frame, ProcessError};

/// Coverage weights for one destination index: `(source index, weight)`.
type AxisTaps = Vec<(usize, f64)>;

/// Resize a frame to exactly `rows × cols` with area averaging.
///
/// The sample type and channel count are preserved. Integer samples are
/// rounded to nearest.
///
/// # Arguments
///
/// * `frame` - Source frame, any channel count
/// * `rows` - Target height in pixels
/// * `cols` - Target width in pixels
///
/// # Errors
///
/// Returns [`ProcessError::ShapeMismatch`] for a zero target or an empty
/// source.
pub fn resize_area<T: Sample>(
    frame: &Frame<T>,
    rows: u32,
    cols: u32,
) -> Result<Frame<T>, ProcessError> {
    if rows == 0 || cols == 0 {
        return Err(ProcessError::shape(
            "non-zero target size",
            format!("{rows}x{cols}"),
        ));
    }
    if frame.is_empty() {
        return Err(ProcessError::shape(
            "non-empty source frame",
            format!("{}x{}", frame.height(), frame.width()),
        ));
    }

    // Fast path: if dimensions match, just clone
    if frame.height() == rows && frame.width() == cols {
        return Ok(frame.clone());
    }

    debug!(
        from_rows = frame.height(),
        from_cols = frame.width(),
        rows,
        cols,
        "area resize"
    );

    let channels = frame.channels();
    let src_w = frame.width() as usize;
    let src_h = frame.height() as usize;
    let dst_w = cols as usize;
    let dst_h = rows as usize;

    let x_taps = axis_taps(src_w, dst_w);
    let y_taps = axis_taps(src_h, dst_h);
    let src = frame.samples();

    // Horizontal pass: src_h rows of dst_w pixels
    let mut horizontal = vec![0.0f64; src_h * dst_w * channels];
    for y in 0..src_h {
        let src_row = y * src_w * channels;
        let dst_row = y * dst_w * channels;
        for (dx, taps) in x_taps.iter().enumerate() {
            for c in 0..channels {
                horizontal[dst_row + dx * channels + c] = taps
                    .iter()
                    .map(|&(sx, w)| src[src_row + sx * channels + c].to_f64() * w)
                    .sum();
            }
        }
    }

    // Vertical pass
    let mut output = Vec::with_capacity(dst_h * dst_w * channels);
    for taps in &y_taps {
        for i in 0..dst_w * channels {
            let value: f64 = taps
                .iter()
                .map(|&(sy, w)| horizontal[sy * dst_w * channels + i] * w)
                .sum();
            output.push(T::from_f64(value));
        }
    }

    Frame::new(cols, rows, channels, output)
}

/// Compute the coverage of every destination index over the source axis.
///
/// Weights for each destination index sum to 1.
fn axis_taps(src: usize, dst: usize) -> Vec<AxisTaps> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            // Multiply before dividing so exact ratios land on integers
            let start = (d * src) as f64 / dst as f64;
            let end = ((d + 1) * src) as f64 / dst as f64;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src);

            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 1e-9).then_some((s, overlap / scale))
                })
                .collect()
        })
        .collect()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
