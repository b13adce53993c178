//! Most frequent exact color
//!
//! Resamples the image to a small square, counts exact RGB values and
//! returns the most frequent one among the top candidates that is neither
//! near-white nor near-black. Cheap and deterministic, but sensitive to
//! JPEG noise on textured garments.
//!
//! Algorithm tag: `algo-most-common-pixel`

use image::imageops::{self, FilterType};
use image::RgbImage;
use std::collections::HashMap;
use tracing::debug;

use super::ColorExtractionStrategy;
use crate::color::Pixel;
use crate::constants::most_common;
use crate::image_loader::{ensure_not_empty, flatten};
use crate::{AnalysisError, Result};

pub const NAME: &str = "most-common-pixel";

/// Most-common-pixel strategy
#[derive(Debug, Clone)]
pub struct MostCommonStrategy {
    sample_size: u32,
    candidates: usize,
}

impl Default for MostCommonStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MostCommonStrategy {
    pub fn new() -> Self {
        Self {
            sample_size: most_common::SAMPLE_SIZE,
            candidates: most_common::CANDIDATES,
        }
    }

    /// Distinct colors with their counts, most frequent first
    ///
    /// Equal counts keep the order in which the colors first appear.
    pub fn ranked_colors(pixels: &[Pixel]) -> Vec<(Pixel, usize)> {
        let mut first_seen: HashMap<[u8; 3], usize> = HashMap::new();
        let mut counts: Vec<(Pixel, usize)> = Vec::new();

        for &pixel in pixels {
            let key = [pixel.red, pixel.green, pixel.blue];
            match first_seen.get(&key) {
                Some(&idx) => counts[idx].1 += 1,
                None => {
                    first_seen.insert(key, counts.len());
                    counts.push((pixel, 1));
                }
            }
        }

        // Stable sort keeps first-appearance order among ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Whether a color is background-like: every channel very bright or very dark
    pub fn is_extreme(pixel: Pixel) -> bool {
        let channels = [pixel.red, pixel.green, pixel.blue];
        channels.iter().all(|&c| c > most_common::NEAR_WHITE)
            || channels.iter().all(|&c| c < most_common::NEAR_BLACK)
    }
}

impl ColorExtractionStrategy for MostCommonStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn dominant_color(&self, image: &RgbImage) -> Result<Pixel> {
        ensure_not_empty(image)?;

        let size = self.sample_size;
        let sampled = imageops::resize(image, size, size, FilterType::CatmullRom);
        let ranked = Self::ranked_colors(&flatten(&sampled));

        let pick = ranked
            .iter()
            .take(self.candidates)
            .map(|&(color, _)| color)
            .find(|&color| !Self::is_extreme(color));

        match pick {
            Some(color) => Ok(color),
            None => {
                debug!("all candidate colors are near-white or near-black, using most common");
                ranked
                    .first()
                    .map(|&(color, _)| color)
                    .ok_or_else(|| AnalysisError::invalid_parameter("pixels", "empty"))
            }
        }
    }
}
