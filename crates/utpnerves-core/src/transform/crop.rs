//! Frame cropping by pixel rectangle or by mask region.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner
//! - `x` grows to the right (columns), `y` grows down (rows)
//! - Boxes are half-open: `x..x + width`, `y..y + height`

use tracing::debug;

use crate::mask::{bounding_boxes, BoundingBox, Mask};
use crate::{Frame, ProcessError};

/// Copy the pixels inside `region` into a new frame.
///
/// # Errors
///
/// Returns [`ProcessError::ShapeMismatch`] if the region is empty or extends
/// past the frame.
pub fn crop<T: Copy>(frame: &Frame<T>, region: BoundingBox) -> Result<Frame<T>, ProcessError> {
    let empty = region.width == 0 || region.height == 0;
    if empty || !region.fits_within(frame.width(), frame.height()) {
        return Err(ProcessError::shape(
            format!("non-empty region inside {}x{}", frame.height(), frame.width()),
            format!(
                "{}x{} region at ({}, {})",
                region.height, region.width, region.x, region.y
            ),
        ));
    }

    let channels = frame.channels();
    let src_stride = frame.width() as usize * channels;
    let row_len = region.width as usize * channels;
    let src = frame.samples();

    // Copy pixel data row by row
    let mut output = Vec::with_capacity(region.height as usize * row_len);
    for y in region.y..region.bottom() {
        let start = y as usize * src_stride + region.x as usize * channels;
        output.extend_from_slice(&src[start..start + row_len]);
    }

    Frame::new(region.width, region.height, channels, output)
}

/// Crop `frame` to the single rectangular region of `mask`.
///
/// The mask is expected to come from
/// [`square_regions`](crate::mask::square_regions): exactly one external
/// region, filled, with at least a 2×2 extent.
///
/// # Errors
///
/// * [`ProcessError::NoRegionFound`] if the mask has zero or several
///   regions, or its region is degenerate or not a filled rectangle
/// * [`ProcessError::ShapeMismatch`] if the rectangle does not fit in `frame`
pub fn crop_to_region<T: Copy>(mask: &Mask, frame: &Frame<T>) -> Result<Frame<T>, ProcessError> {
    let region = single_region(mask)?;
    debug!(?region, "cropping to mask region");
    crop(frame, region)
}

/// The bounding box of the mask's only region, validated as a filled rectangle.
fn single_region(mask: &Mask) -> Result<BoundingBox, ProcessError> {
    let boxes = bounding_boxes(mask);
    let region = match boxes.as_slice() {
        [] => return Err(ProcessError::NoRegionFound("mask has no foreground".to_string())),
        [only] => *only,
        many => {
            return Err(ProcessError::NoRegionFound(format!(
                "expected one region, found {}",
                many.len()
            )))
        }
    };

    // A rectangle needs at least 3 distinct corners
    if region.width < 2 || region.height < 2 {
        return Err(ProcessError::NoRegionFound(format!(
            "degenerate {}x{} region",
            region.height, region.width
        )));
    }

    let filled = (region.y..region.bottom())
        .all(|y| (region.x..region.right()).all(|x| mask.get(x, y)));
    if !filled {
        return Err(ProcessError::NoRegionFound(
            "region is not a filled rectangle".to_string(),
        ));
    }

    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::square_regions;

    /// Create a test frame where each pixel has a unique value based on position.
    fn test_frame(width: u32, height: u32) -> Frame<u8> {
        Frame::from_fn(width, height, 3, |x, y, _| ((y * width + x) % 256) as u8)
    }

    #[test]
    fn test_crop_region() {
        let frame = test_frame(10, 10);
        let result = crop(&frame, BoundingBox::new(2, 3, 4, 5)).unwrap();

        assert_eq!(result.shape(), (5, 4, 3));
        // First pixel should be from position (2, 3) in the original
        assert_eq!(result.get(0, 0, 0), 32);
        assert_eq!(result.get(3, 4, 2), frame.get(5, 7, 2));
    }

    #[test]
    fn test_full_crop_is_identity() {
        let frame = test_frame(8, 6);
        let result = crop(&frame, BoundingBox::new(0, 0, 8, 6)).unwrap();
        assert_eq!(result, frame);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let frame = test_frame(10, 10);
        assert!(matches!(
            crop(&frame, BoundingBox::new(8, 8, 5, 5)),
            Err(ProcessError::ShapeMismatch { .. })
        ));
        assert!(crop(&frame, BoundingBox::new(0, 0, 0, 3)).is_err());
    }

    #[test]
    fn test_crop_to_region_uses_rectangle() {
        let mask = Mask::from_fn(20, 20, |x, y| (4..12).contains(&x) && (6..9).contains(&y));
        let frame = test_frame(20, 20);
        let result = crop_to_region(&mask, &frame).unwrap();
        assert_eq!(result.shape(), (3, 8, 3));
        assert_eq!(result.get(0, 0, 0), frame.get(4, 6, 0));
    }

    #[test]
    fn test_crop_to_region_after_squaring() {
        // Triangle becomes its bounding rectangle
        let mask = Mask::from_fn(30, 30, |x, y| x >= 5 && y >= 5 && x < 20 && y < 20 && x <= y);
        let squared = square_regions(&mask);
        let frame = Frame::filled(30, 30, 1, 0.5f32);
        let result = crop_to_region(&squared, &frame).unwrap();
        assert_eq!(result.shape(), (15, 15, 1));
    }

    #[test]
    fn test_blank_mask_is_no_region() {
        let mask = Mask::new(10, 10);
        let frame = test_frame(10, 10);
        assert!(matches!(
            crop_to_region(&mask, &frame),
            Err(ProcessError::NoRegionFound(_))
        ));
    }

    #[test]
    fn test_several_regions_is_no_region() {
        let mask = Mask::from_fn(20, 10, |x, y| (y < 4) && (x < 4 || (10..14).contains(&x)));
        let frame = test_frame(20, 10);
        assert!(matches!(
            crop_to_region(&mask, &frame),
            Err(ProcessError::NoRegionFound(_))
        ));
    }

    #[test]
    fn test_line_region_is_degenerate() {
        let mask = Mask::from_fn(10, 10, |x, y| y == 5 && (2..8).contains(&x));
        let frame = test_frame(10, 10);
        assert!(matches!(
            crop_to_region(&mask, &frame),
            Err(ProcessError::NoRegionFound(_))
        ));
    }

    #[test]
    fn test_unfilled_region_is_rejected() {
        let mask = Mask::from_fn(10, 10, |x, y| {
            (2..8).contains(&x) && (2..8).contains(&y) && x + y != 9
        });
        let frame = test_frame(10, 10);
        assert!(matches!(
            crop_to_region(&mask, &frame),
            Err(ProcessError::NoRegionFound(_))
        ));
    }

    #[test]
    fn test_crop_to_region_on_each_edge() {
        let frame = test_frame(12, 10);
        let regions = [
            BoundingBox::new(0, 2, 3, 4),
            BoundingBox::new(4, 0, 5, 2),
            BoundingBox::new(9, 3, 3, 5),
            BoundingBox::new(2, 7, 6, 3),
            BoundingBox::new(0, 0, 2, 2),
        ];
        for region in regions {
            let mask = Mask::from_fn(12, 10, |x, y| region.contains(x, y));
            let result = crop_to_region(&mask, &frame).unwrap();
            assert_eq!(result, crop(&frame, region).unwrap(), "{region:?}");
        }
    }

    #[test]
    fn test_crop_to_full_frame_mask() {
        let frame = test_frame(8, 6);
        let mask = Mask::from_fn(8, 6, |_, _| true);
        assert_eq!(crop_to_region(&mask, &frame).unwrap(), frame);
    }

    #[test]
    fn test_region_outside_companion_frame() {
        let mask = Mask::from_fn(40, 40, |x, y| (20..30).contains(&x) && (20..30).contains(&y));
        let small = test_frame(16, 16);
        assert!(matches!(
            crop_to_region(&mask, &small),
            Err(ProcessError::ShapeMismatch { .. })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn region_strategy() -> impl Strategy<Value = (u32, u32, BoundingBox)> {
        (2u32..=40, 2u32..=40)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), 0..w - 1, 0..h - 1))
            .prop_flat_map(|(w, h, x, y)| {
                (Just(w), Just(h), Just(x), Just(y), 2..=w - x, 2..=h - y)
            })
            .prop_map(|(w, h, x, y, bw, bh)| (w, h, BoundingBox::new(x, y, bw, bh)))
    }

    proptest! {
        /// Property: a filled rectangle mask crops to exactly its own box.
        #[test]
        fn prop_rectangle_mask_round_trips((w, h, region) in region_strategy()) {
            let mask = Mask::from_fn(w, h, |x, y| region.contains(x, y));
            let frame = Frame::from_fn(w, h, 1, |x, y, _| (x, y));
            let cropped = crop_to_region(&mask, &frame).unwrap();

            prop_assert_eq!(cropped.width(), region.width);
            prop_assert_eq!(cropped.height(), region.height);
            prop_assert_eq!(cropped.get(0, 0, 0), (region.x, region.y));
        }
    }
}
