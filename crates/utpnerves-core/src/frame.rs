//! Core frame type: an interleaved `height × width × channels` sample buffer.

use image::{DynamicImage, GrayImage};

use crate::ProcessError;

/// Numeric element stored in a [`Frame`].
///
/// Conversions go through `f64` so that resampling and stretching can be
/// written once for every sample type.
pub trait Sample: Copy + Default + PartialOrd + Send + Sync + 'static {
    /// Widen the sample to `f64`.
    fn to_f64(self) -> f64;

    /// Narrow an `f64` back to the sample type.
    ///
    /// Integer samples round to nearest and saturate at their bounds.
    fn from_f64(value: f64) -> Self;
}

impl Sample for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value.round().clamp(0.0, 255.0) as u8
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// An image as a row-major, channel-interleaved buffer.
///
/// `width` is the number of columns and `height` the number of rows, so a
/// frame reports its numpy-style shape as `(height, width, channels)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<T> {
    width: u32,
    height: u32,
    channels: usize,
    samples: Vec<T>,
}

impl<T: Copy> Frame<T> {
    /// Create a frame from raw samples.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::ShapeMismatch`] if `channels` is zero or the
    /// buffer length is not `width * height * channels`.
    pub fn new(
        width: u32,
        height: u32,
        channels: usize,
        samples: Vec<T>,
    ) -> Result<Self, ProcessError> {
        if channels == 0 {
            return Err(ProcessError::shape("at least 1 channel", "0 channels"));
        }
        let expected = width as usize * height as usize * channels;
        if samples.len() != expected {
            return Err(ProcessError::shape(
                format!("{expected} samples for {height}x{width}x{channels}"),
                format!("{} samples", samples.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Create a frame with every sample set to `value`.
    ///
    /// A `channels` of zero is promoted to one.
    pub fn filled(width: u32, height: u32, channels: usize, value: T) -> Self {
        let channels = channels.max(1);
        Self {
            width,
            height,
            channels,
            samples: vec![value; width as usize * height as usize * channels],
        }
    }

    /// Create a frame by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(width: u32, height: u32, channels: usize, mut f: F) -> Self
    where
        F: FnMut(u32, u32, usize) -> T,
    {
        let channels = channels.max(1);
        let mut samples = Vec::with_capacity(width as usize * height as usize * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    samples.push(f(x, y, c));
                }
            }
        }
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape as `(rows, cols, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, self.channels)
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [T] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    /// Total number of pixels (not samples).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sample at column `x`, row `y`, channel `channel`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32, channel: usize) -> T {
        self.samples[self.index(x, y, channel)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, channel: usize, value: T) {
        let idx = self.index(x, y, channel);
        self.samples[idx] = value;
    }

    #[inline]
    fn index(&self, x: u32, y: u32, channel: usize) -> usize {
        assert!(
            x < self.width && y < self.height && channel < self.channels,
            "sample ({x}, {y}, {channel}) out of bounds for {}x{}x{}",
            self.height,
            self.width,
            self.channels
        );
        (y as usize * self.width as usize + x as usize) * self.channels + channel
    }

    /// Apply `f` to every sample, producing a frame of the same shape.
    pub fn map<U, F>(&self, f: F) -> Frame<U>
    where
        F: FnMut(T) -> U,
    {
        Frame {
            width: self.width,
            height: self.height,
            channels: self.channels,
            samples: self.samples.iter().copied().map(f).collect(),
        }
    }

    /// Fail unless the frame holds exactly one channel.
    pub fn ensure_single_channel(&self) -> Result<(), ProcessError> {
        if self.channels != 1 {
            return Err(ProcessError::shape(
                "single-channel frame",
                format!("{} channels", self.channels),
            ));
        }
        Ok(())
    }
}

impl Frame<u8> {
    /// Build a frame from a decoded image, keeping its channel layout.
    ///
    /// Luma, luma-alpha, RGB and RGBA 8-bit images keep 1, 2, 3 and 4
    /// channels. Any other layout is converted to 8-bit RGB.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (1, buf.as_raw().clone()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.as_raw().clone()),
            DynamicImage::ImageRgb8(buf) => (3, buf.as_raw().clone()),
            DynamicImage::ImageRgba8(buf) => (4, buf.as_raw().clone()),
            other => (3, other.to_rgb8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Convert a single-channel frame to an `image::GrayImage`.
    pub fn to_gray_image(&self) -> Result<GrayImage, ProcessError> {
        self.ensure_single_channel()?;
        GrayImage::from_raw(self.width, self.height, self.samples.clone())
            .ok_or_else(|| ProcessError::shape("gray buffer", "short buffer"))
    }

    /// Rescale `[0, 255]` samples to `[0, 1]` floats.
    pub fn to_unit_f32(&self) -> Frame<f32> {
        self.map(|v| v as f32 / 255.0)
    }
}

impl From<&GrayImage> for Frame<u8> {
    fn from(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            channels: 1,
            samples: image.as_raw().clone(),
        }
    }
}
