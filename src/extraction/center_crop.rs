//! Center-crop dominant color with an HSV near-white filter
//!
//! Photographed mockups put the garment in the middle of the frame and
//! spread gradients and props toward the edges. This strategy:
//! 1. Crops the central region (`crop_fraction` of width and height)
//! 2. Resamples it to `sample_size`×`sample_size`
//! 3. Keeps pixels that are saturated or not bright (8-bit HSV), falling
//!    back to every sampled pixel when too few survive
//! 4. Clusters into `cluster_count` colors and takes the largest cluster,
//!    with no brightness filter
//!
//! Algorithm tag: `algo-center-crop-hsv-filter`

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use super::ColorExtractionStrategy;
use crate::color::{saturation_value, KMeans, Pixel};
use crate::config::{CenterCropConfig, ExtractionConfig};
use crate::constants::center_crop::MIN_PIXELS;
use crate::image_loader::{ensure_not_empty, flatten};
use crate::{AnalysisError, Result};

pub const NAME: &str = "center-crop-hsv-filter";

/// Center-crop strategy with HSV background removal
#[derive(Debug, Clone)]
pub struct CenterCropStrategy {
    config: CenterCropConfig,
    kmeans: KMeans,
}

impl Default for CenterCropStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CenterCropStrategy {
    /// Create the strategy with default parameters
    pub fn new() -> Self {
        Self::from_config(&CenterCropConfig::default(), &ExtractionConfig::default())
    }

    /// Crop parameters from `crop`, clustering settings (restarts, seed, ...) from `clustering`
    pub fn from_config(crop: &CenterCropConfig, clustering: &ExtractionConfig) -> Self {
        Self {
            config: crop.clone(),
            kmeans: KMeans::from_config(crop.cluster_count, clustering),
        }
    }

    /// Central region as `(x, y, width, height)`, never empty for a non-empty image
    pub fn crop_region(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let (x, w) = centered_span(width, self.config.crop_fraction);
        let (y, h) = centered_span(height, self.config.crop_fraction);
        (x, y, w, h)
    }

    /// Crop the center and resample it to the analysis size
    pub fn sample(&self, image: &RgbImage) -> RgbImage {
        let (x, y, w, h) = self.crop_region(image.width(), image.height());
        let crop = imageops::crop_imm(image, x, y, w, h).to_image();
        let size = self.config.sample_size;
        imageops::resize(&crop, size, size, FilterType::Triangle)
    }

    /// Whether a pixel survives the near-white filter
    pub fn is_subject(&self, pixel: Pixel) -> bool {
        let (saturation, value) = saturation_value(pixel);
        saturation > self.config.saturation_threshold || value < self.config.value_threshold
    }

    /// Pixels to cluster: the masked pixels, or all of them when too few survive
    pub fn select_pixels(&self, pixels: Vec<Pixel>) -> Vec<Pixel> {
        let masked: Vec<Pixel> = pixels.iter().copied().filter(|&p| self.is_subject(p)).collect();
        let floor = self.config.min_mask_pixels.max(MIN_PIXELS);

        if masked.len() < floor {
            debug!(
                masked = masked.len(),
                total = pixels.len(),
                "too few non-white pixels in center crop, clustering all"
            );
            pixels
        } else {
            masked
        }
    }
}

impl ColorExtractionStrategy for CenterCropStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dominant_color(&self, image: &RgbImage) -> Result<Pixel> {
        ensure_not_empty(image)?;

        let sampled = self.sample(image);
        let pixels = self.select_pixels(flatten(&sampled));
        let clusters = self.kmeans.fit(&pixels)?;

        clusters
            .first()
            .map(|c| c.pixel())
            .ok_or_else(|| AnalysisError::invalid_parameter("clusters", "empty"))
    }
}

/// Start and length of the centered span covering `fraction` of `len`
fn centered_span(len: u32, fraction: f32) -> (u32, u32) {
    let center = len / 2;
    let half = ((len as f32 * fraction) as u32) / 2;
    let start = center.saturating_sub(half);
    let end = (center + half).min(len);

    if end > start {
        (start, end - start)
    } else {
        (center.min(len.saturating_sub(1)), len.min(1))
    }
}
