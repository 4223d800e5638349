//! Connected-component area filtering.

use image::{ImageBuffer, Luma};
use imageproc::region_labelling::connected_components;
use tracing::debug;

use super::{Connectivity, Mask};

/// Default minimum blob area, in pixels, for [`remove_small_regions`].
pub const DEFAULT_MIN_REGION_AREA: usize = 500;

/// Pixel count of every connected foreground component.
///
/// Index 0 is the background label and always holds 0; components are
/// numbered from 1 in raster-scan order of their first pixel.
pub fn region_areas(mask: &Mask, connectivity: Connectivity) -> Vec<usize> {
    let labels = connected_components(mask.as_gray(), connectivity.to_imageproc(), Luma([0u8]));
    label_areas(&labels)
}

fn label_areas(labels: &ImageBuffer<Luma<u32>, Vec<u32>>) -> Vec<usize> {
    let mut areas = vec![0usize];
    for label in labels.pixels().map(|p| p[0] as usize).filter(|&l| l != 0) {
        if label >= areas.len() {
            areas.resize(label + 1, 0);
        }
        areas[label] += 1;
    }
    areas
}

/// Remove every connected component smaller than `min_area` pixels.
///
/// Components with exactly `min_area` pixels are kept. The decision depends
/// only on each component's own area, so labelling order never changes the
/// result.
///
/// # Example
/// ```
/// use utpnerves_core::mask::{remove_small_regions, Connectivity, Mask};
///
/// let mask = Mask::from_fn(10, 10, |x, y| x < 2 && y < 2);
/// let cleaned = remove_small_regions(&mask, 5, Connectivity::Eight);
/// assert!(cleaned.is_blank());
/// ```
pub fn remove_small_regions(mask: &Mask, min_area: usize, connectivity: Connectivity) -> Mask {
    if min_area == 0 {
        return mask.clone();
    }

    let labels = connected_components(mask.as_gray(), connectivity.to_imageproc(), Luma([0u8]));
    let areas = label_areas(&labels);
    let keep: Vec<bool> = areas
        .iter()
        .enumerate()
        .map(|(label, &area)| label != 0 && area >= min_area)
        .collect();

    debug!(
        blobs = areas.len() - 1,
        kept = keep.iter().filter(|&&k| k).count(),
        min_area,
        "small region removal"
    );

    Mask::from_fn(mask.width(), mask.height(), |x, y| {
        keep[labels.get_pixel(x, y)[0] as usize]
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
