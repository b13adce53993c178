//! Near-duplicate color matching
//!
//! Two colors match when their Euclidean distance in RGB is strictly below
//! the tolerance. A missing color (failed extraction) never matches.

use crate::color::{squared_distance, Pixel};
use crate::config::MatchConfig;
use crate::constants::matching::MATCH_TOLERANCE;
use crate::extraction::ColorSample;

/// Decide whether two colors are the same within `tolerance`
///
/// Symmetric, reflexive for present colors, and monotone in `tolerance`.
/// The comparison is done on integer squared distances, so argument order
/// can never change the outcome.
///
/// # Example
///
/// ```
/// use pod_colors::color::Pixel;
/// use pod_colors::matching::is_match;
///
/// let cardinal = Pixel::new(139, 0, 0);
/// assert!(is_match(Some(cardinal), Some(Pixel::new(145, 5, 5)), 30.0));
/// assert!(!is_match(Some(cardinal), Some(Pixel::new(200, 30, 30)), 30.0));
/// assert!(!is_match(Some(cardinal), None, 30.0));
/// ```
pub fn is_match(a: Option<Pixel>, b: Option<Pixel>, tolerance: f32) -> bool {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };

    let d2 = squared_distance(a, b);
    // A color always matches itself, even with a zero tolerance
    if d2 == 0 {
        return true;
    }
    if !(tolerance > 0.0) {
        return false;
    }

    (d2 as f64) < (tolerance as f64) * (tolerance as f64)
}

/// Euclidean RGB distance
pub fn distance(a: Pixel, b: Pixel) -> f32 {
    (squared_distance(a, b) as f32).sqrt()
}

/// Color comparator with a fixed tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatcher {
    tolerance: f32,
}

impl Default for ColorMatcher {
    fn default() -> Self {
        Self::new(MATCH_TOLERANCE)
    }
}

impl ColorMatcher {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.match_tolerance)
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Euclidean RGB distance between two colors
    pub fn distance(&self, a: Pixel, b: Pixel) -> f32 {
        distance(a, b)
    }

    /// See [`is_match`]
    pub fn is_match(&self, a: Option<Pixel>, b: Option<Pixel>) -> bool {
        is_match(a, b, self.tolerance)
    }

    /// Compare two extracted samples
    pub fn samples_match(&self, a: &ColorSample, b: &ColorSample) -> bool {
        self.is_match(Some(a.rgb), Some(b.rgb))
    }
}

/// Two same-named images whose colors do not match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDivergence {
    /// Shared logical name of the images
    pub group_name: String,
    pub sample_a: ColorSample,
    pub sample_b: ColorSample,
    /// Category path of `sample_a` relative to the scan root
    pub category_a: String,
    /// Category path of `sample_b` relative to the scan root
    pub category_b: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDINAL: Pixel = Pixel::new(139, 0, 0);

    #[test]
    fn test_absent_side_never_matches() {
        let matcher = ColorMatcher::default();
        assert!(!matcher.is_match(None, Some(CARDINAL)));
        assert!(!matcher.is_match(Some(CARDINAL), None));
        assert!(!matcher.is_match(None, None));
    }

    #[test]
    fn test_tolerance_is_strict() {
        // 18² + 24² = 900 → distance exactly 30
        let a = Pixel::new(100, 100, 100);
        let b = Pixel::new(118, 124, 100);
        assert_eq!(distance(a, b), 30.0);
        assert!(!is_match(Some(a), Some(b), 30.0));
        assert!(is_match(Some(a), Some(b), 30.5));
    }

    #[test]
    fn test_cardinal_shades() {
        let matcher = ColorMatcher::default();
        let other = Pixel::new(200, 30, 30);
        assert!(matcher.distance(CARDINAL, other) > 70.0);
        assert!(!matcher.is_match(Some(CARDINAL), Some(other)));
        assert!(matcher.is_match(Some(CARDINAL), Some(Pixel::new(150, 10, 5))));
    }

    #[test]
    fn test_zero_tolerance_is_reflexive() {
        assert!(is_match(Some(CARDINAL), Some(CARDINAL), 0.0));
        assert!(!is_match(Some(CARDINAL), Some(Pixel::new(139, 0, 1)), 0.0));
    }

    #[test]
    fn test_samples_match() {
        let matcher = ColorMatcher::new(10.0);
        let a = ColorSample::new("SHIRT/GILDAN/NAVY.png", Pixel::new(0, 0, 128));
        let b = ColorSample::new("HOODIE/GILDAN/NAVY.png", Pixel::new(0, 0, 130));
        assert!(matcher.samples_match(&a, &b));
        assert_eq!(matcher.tolerance(), 10.0);
    }
}
