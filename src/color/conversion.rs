//! Color conversion utilities
//!
//! Provides the primitives every strategy and the matcher share:
//! - Hex encoding and decoding of RGB pixels
//! - Brightness as the channel sum
//! - Squared Euclidean distance in RGB
//! - 8-bit HSV saturation/value (OpenCV scaling)
//! - Centroid to pixel truncation

use palette::{FromColor, Hsv, Srgb};
use crate::{AnalysisError, Result};

/// Canonical pixel: three 8-bit channels in RGB order
pub type Pixel = Srgb<u8>;

/// Encode a pixel as a lowercase 6-hex-digit string (no leading `#`)
///
/// # Example
///
/// ```
/// use pod_colors::color::{hex_of, Pixel};
///
/// assert_eq!(hex_of(Pixel::new(139, 0, 0)), "8b0000");
/// ```
pub fn hex_of(rgb: Pixel) -> String {
    format!("{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Parse a hex color string to a pixel
///
/// Accepts `"8b0000"` or `"#8B0000"`.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidHex` unless the string holds exactly six hex digits
pub fn rgb_of(hex: &str) -> Result<Pixel> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AnalysisError::InvalidHex {
            value: hex.to_string(),
        });
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| AnalysisError::InvalidHex {
            value: hex.to_string(),
        })
    };

    Ok(Pixel::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Sum of the three channels (0-765)
pub fn brightness(rgb: Pixel) -> u32 {
    rgb.red as u32 + rgb.green as u32 + rgb.blue as u32
}

/// Squared Euclidean distance between two pixels
pub fn squared_distance(a: Pixel, b: Pixel) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// 8-bit saturation and value of a pixel
///
/// Scaled like OpenCV's 8-bit HSV: `S = 255 * (max - min) / max`, `V = max`.
pub fn saturation_value(rgb: Pixel) -> (u8, u8) {
    let hsv: Hsv = Hsv::from_color(rgb.into_format::<f32>());
    let saturation = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as u8;
    let value = (hsv.value * 255.0).round().clamp(0.0, 255.0) as u8;
    (saturation, value)
}

/// Convert a floating-point centroid to a pixel
///
/// Channels are truncated toward zero and clamped to [0, 255].
pub fn centroid_to_pixel(centroid: [f32; 3]) -> Pixel {
    let channel = |v: f32| v.clamp(0.0, 255.0) as u8;
    Pixel::new(channel(centroid[0]), channel(centroid[1]), channel(centroid[2]))
}
