use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Geometry and intensity range of the feature vectors produced by
/// [`normalize`](crate::preprocess::normalize).
///
/// # Fields
/// - `width`, `height` — size of the output grid; the vector has `width * height` entries
/// - `x_padding`       — columns left at `scale_min` on the left and on the right
/// - `y_padding`       — rows left at `scale_min` at the top and at the bottom
/// - `scale_min`       — value for black pixels and for every padding cell
/// - `scale_max`       — value for white pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizeParams {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub x_padding: u32,
    #[serde(default)]
    pub y_padding: u32,
    pub scale_min: f64,
    pub scale_max: f64,
}

impl NormalizeParams {
    /// Unpadded params mapping intensities to `[0, 1]`.
    pub fn new(width: u32, height: u32) -> Self {
        NormalizeParams {
            width,
            height,
            x_padding: 0,
            y_padding: 0,
            scale_min: 0.0,
            scale_max: 1.0,
        }
    }

    pub fn with_padding(mut self, x_padding: u32, y_padding: u32) -> Self {
        self.x_padding = x_padding;
        self.y_padding = y_padding;
        self
    }

    pub fn with_scale(mut self, scale_min: f64, scale_max: f64) -> Self {
        self.scale_min = scale_min;
        self.scale_max = scale_max;
        self
    }

    /// Checks that the padding leaves a non-empty interior and that the scale
    /// range is a proper interval.
    pub fn validate(&self) -> PrepResult<()> {
        if 2 * u64::from(self.x_padding) >= u64::from(self.width)
            || 2 * u64::from(self.y_padding) >= u64::from(self.height)
        {
            return Err(PrepError::configuration(format!(
                "image padding too large: {}x{} with padding ({}, {}) leaves no interior",
                self.width, self.height, self.x_padding, self.y_padding
            )));
        }
        if !self.scale_min.is_finite() || !self.scale_max.is_finite() {
            return Err(PrepError::configuration(format!(
                "scale bounds must be finite, got [{}, {}]",
                self.scale_min, self.scale_max
            )));
        }
        if self.scale_min >= self.scale_max {
            return Err(PrepError::configuration(format!(
                "scale_max must be greater than scale_min, got [{}, {}]",
                self.scale_min, self.scale_max
            )));
        }
        Ok(())
    }

    pub fn interior_width(&self) -> u32 {
        self.width - 2 * self.x_padding
    }

    pub fn interior_height(&self) -> u32 {
        self.height - 2 * self.y_padding
    }

    /// Length of every feature vector built with these params.
    pub fn vector_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether flat output `index` falls inside the interior rectangle.
    pub fn is_interior(&self, index: usize) -> bool {
        let width = self.width as usize;
        let (col, row) = (index % width, index / width);
        let (x_pad, y_pad) = (self.x_padding as usize, self.y_padding as usize);
        col >= x_pad
            && col < width - x_pad
            && row >= y_pad
            && row < self.height as usize - y_pad
    }
}
