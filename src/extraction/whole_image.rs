//! Whole-image dominant color with a distance-from-white foreground mask
//!
//! 1. Flatten the image
//! 2. Keep pixels whose squared distance from pure white exceeds the
//!    foreground threshold; too few survivors means the subject is itself
//!    near-white, and every pixel is used instead
//! 3. Cluster into `cluster_count` colors
//! 4. Take the largest cluster whose centroid brightness lies strictly inside
//!    the brightness window, else the largest cluster
//!
//! Algorithm tag: `algo-whole-image-euclidean-filter`

use image::RgbImage;
use tracing::debug;

use super::ColorExtractionStrategy;
use crate::color::{brightness, squared_distance, Cluster, KMeans, Pixel};
use crate::config::{BrightnessRange, ExtractionConfig};
use crate::image_loader::{ensure_not_empty, flatten};
use crate::Result;

pub const NAME: &str = "whole-image-euclidean-filter";

const WHITE: Pixel = Pixel::new(255, 255, 255);

/// Whole-image strategy with Euclidean background removal
#[derive(Debug, Clone)]
pub struct WholeImageStrategy {
    foreground_distance_threshold: u32,
    min_foreground_pixels: usize,
    brightness_range: BrightnessRange,
    kmeans: KMeans,
}

impl Default for WholeImageStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WholeImageStrategy {
    /// Create the strategy with default parameters
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            foreground_distance_threshold: config.foreground_distance_threshold,
            min_foreground_pixels: config.min_foreground_pixels,
            brightness_range: config.brightness_range,
            kmeans: KMeans::from_config(config.cluster_count, config),
        }
    }

    /// Whether a pixel is far enough from white to count as subject
    pub fn is_foreground(&self, pixel: Pixel) -> bool {
        squared_distance(pixel, WHITE) > self.foreground_distance_threshold
    }

    /// Pixels to cluster: the foreground, or everything when the foreground is too small
    pub fn select_pixels(&self, pixels: Vec<Pixel>) -> Vec<Pixel> {
        let foreground: Vec<Pixel> = pixels
            .iter()
            .copied()
            .filter(|&p| self.is_foreground(p))
            .collect();

        if foreground.len() < self.min_foreground_pixels {
            debug!(
                foreground = foreground.len(),
                total = pixels.len(),
                "insufficient foreground, clustering all pixels"
            );
            pixels
        } else {
            foreground
        }
    }

    /// Pick the dominant color from clusters ranked by size
    ///
    /// Returns `None` only for an empty slice.
    pub fn select_cluster(&self, clusters: &[Cluster]) -> Option<Pixel> {
        clusters
            .iter()
            .map(Cluster::pixel)
            .find(|&p| self.brightness_range.contains(brightness(p)))
            .or_else(|| {
                debug!("no cluster inside brightness window, using largest");
                clusters.first().map(Cluster::pixel)
            })
    }
}

impl ColorExtractionStrategy for WholeImageStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dominant_color(&self, image: &RgbImage) -> Result<Pixel> {
        ensure_not_empty(image)?;

        let pixels = self.select_pixels(flatten(image));
        let clusters = self.kmeans.fit(&pixels)?;

        match self.select_cluster(&clusters) {
            Some(color) => Ok(color),
            None => Err(crate::AnalysisError::invalid_parameter("clusters", "empty")),
        }
    }
}
