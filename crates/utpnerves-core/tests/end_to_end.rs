//! End-to-end flow: capture -> model input -> stub model -> cleanup -> crop.

use utpnerves_core::{
    clean_prediction, crop_to_region, mask_from_prediction, prepare_model_input,
    remove_small_regions, resize_area, restore_mask, square_regions, Frame, ModelTensor,
    ProcessError, SegmentationConfig,
};

const CAPTURE_ROWS: u32 = 480;
const CAPTURE_COLS: u32 = 640;

// Bright square in capture coordinates: rows 120..240, cols 160..320
const SQUARE_TOP: u32 = 120;
const SQUARE_LEFT: u32 = 160;
const SQUARE_HEIGHT: u32 = 120;
const SQUARE_WIDTH: u32 = 160;

/// Dark 3-channel capture with a single bright square.
fn synthetic_capture() -> Frame<u8> {
    Frame::from_fn(CAPTURE_COLS, CAPTURE_ROWS, 3, |x, y, _| {
        let inside = (SQUARE_LEFT..SQUARE_LEFT + SQUARE_WIDTH).contains(&x)
            && (SQUARE_TOP..SQUARE_TOP + SQUARE_HEIGHT).contains(&y);
        if inside {
            220
        } else {
            20
        }
    })
}

/// Stand-in for the segmentation model: marks bright pixels as nerve.
fn stub_model(input: &ModelTensor) -> ModelTensor {
    input.mapv(|v| if v > 0.5 { 1.0 } else { 0.0 })
}

fn scaled(value: u32, from: u32, to: u32) -> f64 {
    value as f64 * to as f64 / from as f64
}

#[test]
fn test_capture_to_crop_recovers_scaled_square() {
    let config = SegmentationConfig::default();
    let capture = synthetic_capture();

    let tensor = prepare_model_input(&capture, &config).unwrap();
    assert_eq!(tensor.shape(), &[1, 180, 320, 1]);

    let prediction = stub_model(&tensor);
    let mask = mask_from_prediction(prediction.view(), config.prediction_threshold).unwrap();
    let cleaned = remove_small_regions(&mask, config.min_region_area, config.connectivity);
    let rect = square_regions(&cleaned);

    let companion = resize_area(&capture, config.target_rows, config.target_cols).unwrap();
    let crop = crop_to_region(&rect, &companion).unwrap();

    let expected_rows = scaled(SQUARE_HEIGHT, CAPTURE_ROWS, config.target_rows);
    let expected_cols = scaled(SQUARE_WIDTH, CAPTURE_COLS, config.target_cols);
    assert!(
        (crop.height() as f64 - expected_rows).abs() <= 1.0,
        "crop height {} vs expected {expected_rows}",
        crop.height()
    );
    assert!(
        (crop.width() as f64 - expected_cols).abs() <= 1.0,
        "crop width {} vs expected {expected_cols}",
        crop.width()
    );
    assert_eq!(crop.channels(), 3);
}

#[test]
fn test_clean_prediction_matches_manual_steps() {
    let config = SegmentationConfig::default();
    let tensor = prepare_model_input(&synthetic_capture(), &config).unwrap();
    let prediction = stub_model(&tensor);

    let manual = square_regions(&remove_small_regions(
        &mask_from_prediction(prediction.view(), config.prediction_threshold).unwrap(),
        config.min_region_area,
        config.connectivity,
    ));
    assert_eq!(clean_prediction(&prediction, &config).unwrap(), manual);
}

#[test]
fn test_restored_mask_crops_full_resolution_capture() {
    let config = SegmentationConfig::default();
    let capture = synthetic_capture();

    let tensor = prepare_model_input(&capture, &config).unwrap();
    let rect = clean_prediction(&stub_model(&tensor), &config).unwrap();
    let restored = restore_mask(&rect, CAPTURE_ROWS, CAPTURE_COLS).unwrap();

    let crop = crop_to_region(&restored, &capture).unwrap();
    assert!((crop.height() as i64 - SQUARE_HEIGHT as i64).abs() <= 1);
    assert!((crop.width() as i64 - SQUARE_WIDTH as i64).abs() <= 1);
    // The crop lies inside the bright square
    assert!(crop.samples().iter().all(|&v| v == 220));
}

#[test]
fn test_small_bright_spot_leaves_nothing_to_crop() {
    // The spot covers well under 1% of the samples, so it needs a higher
    // stretch ceiling to stand out from the background texture
    let config = SegmentationConfig {
        high_percentile: 99.99,
        ..Default::default()
    };
    // A 12x12 spot shrinks to about 5x6 model pixels, far below min_region_area
    let capture = Frame::from_fn(CAPTURE_COLS, CAPTURE_ROWS, 3, |x, y, _| {
        if (300..312).contains(&x) && (200..212).contains(&y) {
            255
        } else {
            (x % 7) as u8
        }
    });

    let tensor = prepare_model_input(&capture, &config).unwrap();
    let rect = clean_prediction(&stub_model(&tensor), &config).unwrap();
    assert!(rect.is_blank());

    let companion = resize_area(&capture, config.target_rows, config.target_cols).unwrap();
    assert!(matches!(
        crop_to_region(&rect, &companion),
        Err(ProcessError::NoRegionFound(_))
    ));
}
