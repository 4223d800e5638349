//! Binary segmentation masks and their post-processing.
//!
//! ## Operations
//!
//! - **Region filtering**: drop connected components below an area threshold
//! - **Bounding geometry**: replace each blob with its enclosing rectangle
//!
//! A [`Mask`] stores foreground as 1 and background as 0 in a `GrayImage`,
//! which lets `imageproc` label and trace it without conversion.

pub mod rect;
pub mod regions;

pub use rect::{bounding_boxes, draw_bounding_rects, square_regions, BoundingBox, RectStyle};
pub use regions::{region_areas, remove_small_regions};

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::frame::Sample;
use crate::{Frame, ProcessError};

const FOREGROUND: Luma<u8> = Luma([1]);
const BACKGROUND: Luma<u8> = Luma([0]);

/// Pixel adjacency used when grouping foreground into blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Edge neighbours only.
    Four,
    /// Edge and corner neighbours.
    #[default]
    Eight,
}

impl Connectivity {
    /// Convert to the imageproc labelling connectivity.
    pub fn to_imageproc(self) -> imageproc::region_labelling::Connectivity {
        match self {
            Connectivity::Four => imageproc::region_labelling::Connectivity::Four,
            Connectivity::Eight => imageproc::region_labelling::Connectivity::Eight,
        }
    }
}

/// A single-channel binary image.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pixels: GrayImage,
}

impl Mask {
    /// Create an all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::new(width, height),
        }
    }

    /// Create a mask from a predicate over `(x, y)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        Self {
            pixels: GrayImage::from_fn(width, height, |x, y| {
                if f(x, y) {
                    FOREGROUND
                } else {
                    BACKGROUND
                }
            }),
        }
    }

    /// Build a mask from a gray image; any nonzero pixel is foreground.
    pub fn from_gray(image: &GrayImage) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| image.get_pixel(x, y)[0] != 0)
    }

    /// Build a mask from a single-channel frame; any nonzero sample is foreground.
    ///
    /// # Errors
    /// Returns [`ProcessError::ShapeMismatch`] if the frame has more than one channel.
    pub fn from_frame<T: Sample>(frame: &Frame<T>) -> Result<Self, ProcessError> {
        frame.ensure_single_channel()?;
        Ok(Self::from_fn(frame.width(), frame.height(), |x, y| {
            frame.get(x, y, 0).to_f64() != 0.0
        }))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// True if `(x, y)` is foreground.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y)[0] != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let value = if foreground { FOREGROUND } else { BACKGROUND };
        self.pixels.put_pixel(x, y, value);
    }

    /// Number of foreground pixels.
    pub fn area(&self) -> usize {
        self.pixels.as_raw().iter().filter(|&&v| v != 0).count()
    }

    /// True when the mask holds no foreground.
    pub fn is_blank(&self) -> bool {
        self.pixels.as_raw().iter().all(|&v| v == 0)
    }

    /// Borrow the 0/1 gray image.
    pub fn as_gray(&self) -> &GrayImage {
        &self.pixels
    }

    /// Mutable access for imageproc drawing routines.
    pub(crate) fn as_gray_mut(&mut self) -> &mut GrayImage {
        &mut self.pixels
    }

    /// Export as a `{0.0, 1.0}` float frame.
    pub fn to_frame(&self) -> Frame<f32> {
        Frame::from_fn(self.width(), self.height(), 1, |x, y, _| {
            if self.get(x, y) {
                1.0
            } else {
                0.0
            }
        })
    }
}

impl From<&GrayImage> for Mask {
    fn from(image: &GrayImage) -> Self {
        Self::from_gray(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mask_is_blank() {
        let mask = Mask::new(10, 5);
        assert!(mask.is_blank());
        assert_eq!(mask.area(), 0);
        assert_eq!((mask.width(), mask.height()), (10, 5));
    }

    #[test]
    fn test_from_gray_binarizes() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([[0, 17, 255][x as usize]]));
        let mask = Mask::from_gray(&gray);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(mask.as_gray().get_pixel(2, 0)[0], 1);
    }

    #[test]
    fn test_from_frame_nonzero_is_foreground() {
        let frame = Frame::new(4, 1, 1, vec![0.0f32, 0.2, 1.0, -1.0]).unwrap();
        let mask = Mask::from_frame(&frame).unwrap();
        assert_eq!(mask.area(), 3);
        assert!(!mask.get(0, 0));
    }

    #[test]
    fn test_from_frame_rejects_color() {
        let frame = Frame::filled(2, 2, 3, 1u8);
        assert!(Mask::from_frame(&frame).is_err());
    }

    #[test]
    fn test_to_frame_is_zero_one() {
        let mask = Mask::from_fn(4, 4, |x, y| x == y);
        let frame = mask.to_frame();
        assert_eq!(frame.shape(), (4, 4, 1));
        assert!(frame.samples().iter().all(|&v| v == 0.0 || v == 1.0));
        assert_eq!(frame.samples().iter().filter(|&&v| v == 1.0).count(), 4);
    }

    #[test]
    fn test_set_toggles_pixel() {
        let mut mask = Mask::new(2, 2);
        mask.set(1, 0, true);
        assert_eq!(mask.area(), 1);
        mask.set(1, 0, false);
        assert!(mask.is_blank());
    }

    #[test]
    fn test_connectivity_conversion() {
        assert!(matches!(
            Connectivity::Four.to_imageproc(),
            imageproc::region_labelling::Connectivity::Four
        ));
        assert!(matches!(
            Connectivity::Eight.to_imageproc(),
            imageproc::region_labelling::Connectivity::Eight
        ));
        assert_eq!(Connectivity::default(), Connectivity::Eight);
    }
}
