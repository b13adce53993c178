//! Configuration structures for extraction, matching and scanning.
//!
//! All tunable parameters live in one value object that is passed into the
//! extraction and matching functions, organized into logical groups.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use pod_colors::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), pod_colors::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`ExtractionConfig`]: whole-image foreground filter and clustering
//! - [`CenterCropConfig`]: center-crop HSV filter
//! - [`MatchConfig`]: color matching tolerance
//! - [`ScanConfig`]: directory walking and grouping

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{center_crop, clustering, matching, scan, whole_image};
use crate::extraction::StrategyKind;
use crate::image_loader::is_supported_extension;
use crate::{AnalysisError, Result};

/// Complete configuration for a color scan.
///
/// Missing sections and fields fall back to their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Extraction strategy used for every image
    pub strategy: StrategyKind,

    /// Whole-image strategy and shared clustering parameters
    pub extraction: ExtractionConfig,

    /// Center-crop strategy parameters
    pub center_crop: CenterCropConfig,

    /// Matching parameters
    pub matching: MatchConfig,

    /// Directory scan parameters
    pub scan: ScanConfig,
}

/// Whole-image extraction parameters.
///
/// The clustering fields (`restarts`, `max_iterations`, `convergence`, `seed`)
/// are shared by every k-means based strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Squared distance from white above which a pixel is foreground
    pub foreground_distance_threshold: u32,

    /// Minimum foreground pixels before falling back to the whole image
    pub min_foreground_pixels: usize,

    /// Number of clusters
    pub cluster_count: usize,

    /// Centroid brightness window for the dominant cluster
    pub brightness_range: BrightnessRange,

    /// k-means++ initializations per fit
    pub restarts: usize,

    /// Lloyd iterations per initialization
    pub max_iterations: usize,

    /// Largest squared centroid shift treated as converged
    pub convergence: f32,

    /// RNG seed for centroid initialization
    pub seed: u64,
}

/// Exclusive brightness bounds (sum of the three channels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrightnessRange {
    pub min: u32,
    pub max: u32,
}

impl BrightnessRange {
    /// True when `brightness` lies strictly between the bounds
    pub fn contains(&self, brightness: u32) -> bool {
        brightness > self.min && brightness < self.max
    }
}

/// Center-crop extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterCropConfig {
    /// Fraction of width and height kept around the center (0.0-1.0]
    pub crop_fraction: f32,

    /// Side length of the resampled crop
    pub sample_size: u32,

    /// Keep pixels with saturation above this (8-bit)
    pub saturation_threshold: u8,

    /// Keep pixels with value below this (8-bit)
    pub value_threshold: u8,

    /// Minimum masked pixels before falling back to all sampled pixels
    pub min_mask_pixels: usize,

    /// Number of clusters
    pub cluster_count: usize,
}

/// Matching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Euclidean RGB distance below which two colors match
    pub match_tolerance: f32,
}

/// Directory scan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Image extensions, without the dot (matched case-insensitively)
    pub extensions: Vec<String>,

    /// Group names case-sensitively
    pub case_sensitive: bool,

    /// Extract images on the rayon thread pool
    pub parallel: bool,

    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            foreground_distance_threshold: whole_image::FOREGROUND_DISTANCE_THRESHOLD,
            min_foreground_pixels: whole_image::MIN_FOREGROUND_PIXELS,
            cluster_count: whole_image::CLUSTER_COUNT,
            brightness_range: BrightnessRange::default(),
            restarts: clustering::RESTARTS,
            max_iterations: clustering::MAX_ITERATIONS,
            convergence: clustering::CONVERGENCE,
            seed: clustering::SEED,
        }
    }
}

impl Default for BrightnessRange {
    fn default() -> Self {
        Self {
            min: whole_image::MIN_BRIGHTNESS,
            max: whole_image::MAX_BRIGHTNESS,
        }
    }
}

impl Default for CenterCropConfig {
    fn default() -> Self {
        Self {
            crop_fraction: center_crop::CROP_FRACTION,
            sample_size: center_crop::SAMPLE_SIZE,
            saturation_threshold: center_crop::SATURATION_THRESHOLD,
            value_threshold: center_crop::VALUE_THRESHOLD,
            min_mask_pixels: center_crop::MIN_MASK_PIXELS,
            cluster_count: center_crop::CLUSTER_COUNT,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_tolerance: matching::MATCH_TOLERANCE,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: scan::IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            case_sensitive: true,
            parallel: true,
            recursive: true,
        }
    }
}

impl ScanConfig {
    /// Check whether `path` has one of the configured image extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Check parameter invariants
    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        if extraction.cluster_count == 0 {
            return Err(AnalysisError::invalid_parameter("extraction.cluster_count", 0));
        }
        if extraction.restarts == 0 {
            return Err(AnalysisError::invalid_parameter("extraction.restarts", 0));
        }
        if extraction.max_iterations == 0 {
            return Err(AnalysisError::invalid_parameter("extraction.max_iterations", 0));
        }
        if !(extraction.convergence >= 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "extraction.convergence",
                extraction.convergence,
            ));
        }
        let range = extraction.brightness_range;
        if range.min >= range.max {
            return Err(AnalysisError::invalid_parameter(
                "extraction.brightness_range",
                format!("({}, {})", range.min, range.max),
            ));
        }

        let crop = &self.center_crop;
        if !(crop.crop_fraction > 0.0 && crop.crop_fraction <= 1.0) {
            return Err(AnalysisError::invalid_parameter(
                "center_crop.crop_fraction",
                crop.crop_fraction,
            ));
        }
        if crop.sample_size == 0 {
            return Err(AnalysisError::invalid_parameter("center_crop.sample_size", 0));
        }
        if crop.cluster_count == 0 {
            return Err(AnalysisError::invalid_parameter("center_crop.cluster_count", 0));
        }

        if !(self.matching.match_tolerance >= 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "matching.match_tolerance",
                self.matching.match_tolerance,
            ));
        }

        if self.scan.extensions.is_empty() {
            return Err(AnalysisError::invalid_parameter("scan.extensions", "[]"));
        }
        if let Some(ext) = self.scan.extensions.iter().find(|e| !is_supported_extension(e)) {
            return Err(AnalysisError::invalid_parameter("scan.extensions", ext));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.foreground_distance_threshold, 3000);
        assert_eq!(config.extraction.min_foreground_pixels, 100);
        assert_eq!(config.extraction.cluster_count, 3);
        assert_eq!(config.extraction.brightness_range, BrightnessRange { min: 60, max: 700 });
        assert_eq!(config.matching.match_tolerance, 30.0);
        assert_eq!(config.strategy, StrategyKind::WholeImage);
    }

    #[test]
    fn test_brightness_range_is_exclusive() {
        let range = BrightnessRange::default();
        assert!(!range.contains(60));
        assert!(range.contains(61));
        assert!(range.contains(699));
        assert!(!range.contains(700));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.extraction.cluster_count = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.extraction.brightness_range = BrightnessRange { min: 700, max: 60 };
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.center_crop.crop_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.matching.match_tolerance = -1.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.scan.extensions.push("heic".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "strategy": "center-crop-hsv-filter", "matching": { "match_tolerance": 12.5 } }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.strategy, StrategyKind::CenterCrop);
        assert_eq!(config.matching.match_tolerance, 12.5);
        assert_eq!(config.extraction, ExtractionConfig::default());
        assert!(config.scan.case_sensitive);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PipelineConfig::default();
        config.extraction.seed = 7;
        config.scan.case_sensitive = false;
        config.to_json_file(&path).unwrap();

        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_scan_accepts_extensions() {
        let scan = ScanConfig::default();
        assert!(scan.accepts(Path::new("a/RED.png")));
        assert!(scan.accepts(Path::new("a/RED.JPG")));
        assert!(scan.accepts(Path::new("RED.bmp")));
        assert!(!scan.accepts(Path::new("RED.gif")));
        assert!(!scan.accepts(Path::new("RED")));
    }
}
