//! Dominant color extraction
//!
//! Every strategy isolates the subject of a product image and returns its
//! single most representative color. The strategies use different
//! background filters and suit different image populations, so callers pick
//! one explicitly:
//!
//! - [`WholeImageStrategy`] (`whole-image-euclidean-filter`): distance-from-white
//!   mask over the whole image, brightness-filtered cluster choice. Suits
//!   flat white backgrounds.
//! - [`CenterCropStrategy`] (`center-crop-hsv-filter`): HSV mask over the
//!   central region, largest cluster. Suits photographed mockups with
//!   gradients.
//! - [`MostCommonStrategy`] (`most-common-pixel`): most frequent exact color
//!   that is neither near-white nor near-black. No clustering.

pub mod whole_image;
pub mod center_crop;
pub mod most_common;

pub use center_crop::CenterCropStrategy;
pub use most_common::MostCommonStrategy;
pub use whole_image::WholeImageStrategy;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::color::{hex_of, Pixel};
use crate::image_loader::load_image;
use crate::{AnalysisError, PipelineConfig, Result};

/// Extracted color for one image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSample {
    /// Source image
    pub path: PathBuf,
    /// Dominant color
    pub rgb: Pixel,
}

impl ColorSample {
    pub fn new(path: impl Into<PathBuf>, rgb: Pixel) -> Self {
        Self {
            path: path.into(),
            rgb,
        }
    }

    /// Lowercase 6-hex-digit encoding of [`Self::rgb`]
    pub fn hex(&self) -> String {
        hex_of(self.rgb)
    }

    /// File name of the source image, lossily converted
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A dominant color heuristic
///
/// Implementations are pure functions of the decoded pixels and must be
/// shareable across the scan thread pool.
pub trait ColorExtractionStrategy: Send + Sync {
    /// Stable strategy name, as accepted by [`StrategyKind::from_str`]
    fn name(&self) -> &'static str;

    /// Dominant color of a decoded RGB image
    fn dominant_color(&self, image: &RgbImage) -> Result<Pixel>;

    /// Extract from an already decoded image
    fn extract_image(&self, path: &Path, image: &RgbImage) -> Result<ColorSample> {
        let rgb = self.dominant_color(image)?;
        Ok(ColorSample::new(path, rgb))
    }

    /// Load and extract from an image file
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ImageLoadError` for unreadable or corrupt
    /// files and `AnalysisError::EmptyImage` for zero-pixel images
    fn extract_path(&self, path: &Path) -> Result<ColorSample> {
        let image = load_image(path)?;
        self.extract_image(path, &image)
    }
}

/// Named extraction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    #[default]
    #[serde(rename = "whole-image-euclidean-filter")]
    WholeImage,
    #[serde(rename = "center-crop-hsv-filter")]
    CenterCrop,
    #[serde(rename = "most-common-pixel")]
    MostCommon,
}

impl StrategyKind {
    /// Every strategy, in declaration order
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::WholeImage,
        StrategyKind::CenterCrop,
        StrategyKind::MostCommon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::WholeImage => whole_image::NAME,
            StrategyKind::CenterCrop => center_crop::NAME,
            StrategyKind::MostCommon => most_common::NAME,
        }
    }

    /// Instantiate the strategy with parameters from `config`
    pub fn build(&self, config: &PipelineConfig) -> Box<dyn ColorExtractionStrategy> {
        match self {
            StrategyKind::WholeImage => {
                Box::new(WholeImageStrategy::from_config(&config.extraction))
            }
            StrategyKind::CenterCrop => Box::new(CenterCropStrategy::from_config(
                &config.center_crop,
                &config.extraction,
            )),
            StrategyKind::MostCommon => Box::new(MostCommonStrategy::new()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| AnalysisError::UnknownStrategy { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_strategy_names_roundtrip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
            assert_eq!(kind.build(&PipelineConfig::default()).name(), kind.name());
        }
        assert_eq!(StrategyKind::WholeImage.to_string(), "whole-image-euclidean-filter");
        assert_eq!(StrategyKind::CenterCrop.to_string(), "center-crop-hsv-filter");
        assert!(matches!(
            "best-guess".parse::<StrategyKind>(),
            Err(AnalysisError::UnknownStrategy { .. })
        ));
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&StrategyKind::CenterCrop).unwrap();
        assert_eq!(json, "\"center-crop-hsv-filter\"");
        let kind: StrategyKind = serde_json::from_str("\"most-common-pixel\"").unwrap();
        assert_eq!(kind, StrategyKind::MostCommon);
    }

    #[test]
    fn test_sample_hex_follows_rgb() {
        let mut sample = ColorSample::new("HOODIE/GILDAN/NAVY.png", Pixel::new(0, 0, 128));
        assert_eq!(sample.hex(), "000080");
        assert_eq!(sample.file_name(), "NAVY.png");

        sample.rgb = Pixel::new(139, 0, 0);
        assert_eq!(sample.hex(), "8b0000");
    }

    #[test]
    fn test_extract_image_keeps_path() {
        let image = RgbImage::from_pixel(20, 20, Rgb([0, 0, 128]));
        let strategy = WholeImageStrategy::new();
        let sample = strategy.extract_image(Path::new("NAVY.png"), &image).unwrap();
        assert_eq!(sample.path, PathBuf::from("NAVY.png"));
        assert_eq!(sample.rgb, Pixel::new(0, 0, 128));
    }
}
