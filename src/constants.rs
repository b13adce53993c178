//! Default thresholds and limits for color extraction and matching
//!
//! These values were tuned on flat-background product photography and are
//! the defaults behind [`crate::config::PipelineConfig`]. They are starting
//! points, not calibrated ground truth: image sets with other backgrounds
//! should be re-tuned through configuration.

/// Whole-image strategy: Euclidean distance-from-white foreground filter
pub mod whole_image {
    /// Squared RGB distance from pure white above which a pixel is foreground
    /// (roughly a distance of 55)
    pub const FOREGROUND_DISTANCE_THRESHOLD: u32 = 3000;

    /// Below this many foreground pixels the mask is ignored and all pixels are clustered
    pub const MIN_FOREGROUND_PIXELS: usize = 100;

    /// Number of k-means clusters
    pub const CLUSTER_COUNT: usize = 3;

    /// Exclusive lower bound on centroid brightness (sum of channels)
    pub const MIN_BRIGHTNESS: u32 = 60;

    /// Exclusive upper bound on centroid brightness (sum of channels)
    pub const MAX_BRIGHTNESS: u32 = 700;
}

/// Center-crop strategy: HSV near-white filter on the central region
pub mod center_crop {
    /// Fraction of width and height kept around the image center
    pub const CROP_FRACTION: f32 = 0.6;

    /// Side length the crop is resampled to before clustering
    pub const SAMPLE_SIZE: u32 = 100;

    /// Pixels with 8-bit saturation above this are kept
    pub const SATURATION_THRESHOLD: u8 = 20;

    /// Pixels with 8-bit value below this are kept
    pub const VALUE_THRESHOLD: u8 = 220;

    /// Below this many masked pixels the mask is ignored
    pub const MIN_MASK_PIXELS: usize = 1000;

    /// Hard floor for the mask, whatever `MIN_MASK_PIXELS` is configured to
    pub const MIN_PIXELS: usize = 100;

    /// Number of k-means clusters
    pub const CLUSTER_COUNT: usize = 5;
}

/// Most-common-pixel strategy
pub mod most_common {
    /// Side length the image is resampled to before counting
    pub const SAMPLE_SIZE: u32 = 100;

    /// How many of the most frequent colors are considered
    pub const CANDIDATES: usize = 10;

    /// All channels above this count as near-white
    pub const NEAR_WHITE: u8 = 240;

    /// All channels below this count as near-black
    pub const NEAR_BLACK: u8 = 15;
}

/// k-means clustering parameters
pub mod clustering {
    /// Independent k-means++ initializations per fit
    pub const RESTARTS: usize = 10;

    /// Lloyd iterations per initialization
    pub const MAX_ITERATIONS: usize = 300;

    /// Largest squared centroid shift (channel units) treated as converged
    pub const CONVERGENCE: f32 = 0.01;

    /// Default RNG seed, pinned so repeated runs agree
    pub const SEED: u64 = 0x5EED_C0_10;
}

/// Color matching
pub mod matching {
    /// Euclidean RGB distance below which two colors are considered the same
    pub const MATCH_TOLERANCE: f32 = 30.0;
}

/// Directory scanning
pub mod scan {
    /// File extensions considered images (compared case-insensitively)
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

    /// Minimum members for a name group to be compared
    pub const MIN_GROUP_SIZE: usize = 2;
}
