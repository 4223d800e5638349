//! Bounding rectangles of mask regions.
//!
//! Regions are found by tracing external contours, i.e. the outer border of
//! every blob that is not nested inside a hole of another blob. Each box is
//! the inclusive pixel extent of its contour.
//!
//! The image border counts as background, so blobs touching any edge are
//! traced like interior ones.

use image::imageops::replace;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Mask, FOREGROUND};

/// Axis-aligned rectangle in pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True when the box lies inside a `width × height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    fn to_rect(self) -> Rect {
        Rect::at(self.x as i32, self.y as i32).of_size(self.width, self.height)
    }
}

/// How rectangles are painted by [`draw_bounding_rects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectStyle {
    /// Solid rectangle covering the whole box.
    #[default]
    Filled,
    /// Border only, `thickness` pixels wide, drawn inward from the box edge.
    Outline { thickness: u32 },
}

/// Bounding boxes of the mask's external contours, in raster-scan order.
///
/// Returns an empty list for a blank mask.
pub fn bounding_boxes(mask: &Mask) -> Vec<BoundingBox> {
    if mask.width() == 0 || mask.height() == 0 {
        return Vec::new();
    }

    // Contour tracing only starts inside the image, pad so edge blobs get a border
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    replace(&mut padded, mask.as_gray(), 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let min_x = c.points.iter().map(|p| p.x).min()?;
            let max_x = c.points.iter().map(|p| p.x).max()?;
            let min_y = c.points.iter().map(|p| p.y).min()?;
            let max_y = c.points.iter().map(|p| p.y).max()?;
            // Undo the padding offset
            Some(BoundingBox::new(
                (min_x - 1) as u32,
                (min_y - 1) as u32,
                (max_x - min_x + 1) as u32,
                (max_y - min_y + 1) as u32,
            ))
        })
        .collect()
}

/// Paint the bounding box of every external region onto a blank mask.
pub fn draw_bounding_rects(mask: &Mask, style: RectStyle) -> Mask {
    let boxes = bounding_boxes(mask);
    debug!(regions = boxes.len(), ?style, "drawing bounding rectangles");

    let mut canvas = Mask::new(mask.width(), mask.height());
    for b in boxes {
        match style {
            RectStyle::Filled => {
                draw_filled_rect_mut(canvas.as_gray_mut(), b.to_rect(), FOREGROUND)
            }
            RectStyle::Outline { thickness } => {
                for inset in 0..thickness {
                    let w = b.width.saturating_sub(2 * inset);
                    let h = b.height.saturating_sub(2 * inset);
                    if w == 0 || h == 0 {
                        break;
                    }
                    let ring = BoundingBox::new(b.x + inset, b.y + inset, w, h);
                    draw_hollow_rect_mut(canvas.as_gray_mut(), ring.to_rect(), FOREGROUND);
                }
            }
        }
    }
    canvas
}

/// Replace every external region with its filled bounding rectangle.
///
/// A blank mask yields a blank mask.
pub fn square_regions(mask: &Mask) -> Mask {
    draw_bounding_rects(mask, RectStyle::Filled)
}
