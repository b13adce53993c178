//! # POD Colors
//!
//! Dominant garment color extraction and same-name color checks for
//! print-on-demand product images.
//!
//! Product catalogs ship one image per color variant, named after the color
//! (`HOODIE/GILDAN/CARDINAL.png`, `SHIRT/GILDAN/CARDINAL.jpg`, ...). This
//! library:
//! - Extracts the single most visually dominant non-background color of an
//!   image with one of several named strategies
//! - Decides whether two colors are the same within a tolerance
//! - Scans directory trees for same-named images whose colors diverge
//! - Writes CSV reports of the findings
//!
//! ## Example
//!
//! ```rust,no_run
//! use pod_colors::{group_and_compare, PipelineConfig};
//! use std::path::Path;
//!
//! let report = group_and_compare(Path::new("PNG"), &PipelineConfig::default())?;
//! for d in &report.entries {
//!     println!("{}: #{} vs #{}", d.group_name, d.sample_a.hex(), d.sample_b.hex());
//! }
//! println!("{} images skipped", report.skipped.len());
//! # Ok::<(), pod_colors::AnalysisError>(())
//! ```

use std::path::Path;

pub mod error;
pub mod constants;
pub mod config;
pub mod image_loader;
pub mod color;
pub mod extraction;
pub mod matching;
pub mod scan;
pub mod report;

pub use config::PipelineConfig;
pub use error::{AnalysisError, Result};
pub use extraction::{ColorExtractionStrategy, ColorSample, StrategyKind};
pub use matching::{ColorDivergence, ColorMatcher};
pub use scan::{CatalogEntry, ColorScanner, GroupMember, ScanReport, SkippedFile};

/// Extract the dominant color of one image with the configured strategy
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the image cannot be decoded and
/// `AnalysisError::EmptyImage` if it has no pixels
pub fn extract_color(image_path: &Path, config: &PipelineConfig) -> Result<ColorSample> {
    config.strategy.build(config).extract_path(image_path)
}

/// Find same-named images under `root` whose colors diverge
///
/// See [`ColorScanner::group_and_compare`].
pub fn group_and_compare(
    root: &Path,
    config: &PipelineConfig,
) -> Result<ScanReport<ColorDivergence>> {
    ColorScanner::from_config(config).group_and_compare(root)
}

/// Every member of every divergent name group under `root`
///
/// See [`ColorScanner::collect_divergent_groups`].
pub fn collect_divergent_groups(
    root: &Path,
    config: &PipelineConfig,
) -> Result<ScanReport<GroupMember>> {
    ColorScanner::from_config(config).collect_divergent_groups(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Pixel;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_extract_color_with_each_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NAVY.png");
        RgbImage::from_pixel(64, 64, Rgb([0, 0, 128])).save(&path).unwrap();

        for kind in StrategyKind::ALL {
            let config = PipelineConfig {
                strategy: kind,
                ..PipelineConfig::default()
            };
            let sample = extract_color(&path, &config).unwrap();
            assert_eq!(sample.rgb, Pixel::new(0, 0, 128), "strategy {}", kind);
            assert_eq!(sample.hex(), "000080");
        }
    }

    #[test]
    fn test_extract_color_missing_file() {
        let err = extract_color(Path::new("no/such/image.png"), &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ImageLoadError { .. }));
        assert!(err.is_recoverable());
    }
}
