//! Unified image loading into canonical RGB
//!
//! Every decoder output (palette, grayscale, RGBA, 16-bit) is normalized to
//! 8-bit RGB here, so nothing downstream ever sees BGR or alpha channels.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: JPEG, PNG, BMP, GIF (first frame only).

use crate::error::{AnalysisError, Result};
use image::{ImageReader, RgbImage};
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// BMP image
    Bmp,
    /// GIF image (first frame only)
    Gif,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "bmp" => Some(ImageFormat::Bmp),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

/// Load an image from disk as canonical 8-bit RGB
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the file cannot be opened,
/// its format is unknown, or decoding fails (including zero-byte files), and
/// `AnalysisError::EmptyImage` if it decodes to zero pixels.
///
/// # Example
///
/// ```rust,no_run
/// use pod_colors::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("HOODIE/GILDAN/NAVY.png"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), pod_colors::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    // Extension-less or mislabeled files are sniffed from their header
    let reader = reader.with_guessed_format().map_err(|e| {
        AnalysisError::image_load(format!("Failed to read image header: {}", path.display()), e)
    })?;

    let img = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = img.to_rgb8();
    ensure_not_empty(&rgb)?;
    Ok(rgb)
}

/// Reject images with zero width or height
pub fn ensure_not_empty(image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalysisError::EmptyImage { width, height });
    }
    Ok(())
}

/// Flatten an image into a pixel sequence in row-major order
pub fn flatten(image: &RgbImage) -> Vec<crate::color::Pixel> {
    image
        .pixels()
        .map(|p| crate::color::Pixel::new(p[0], p[1], p[2]))
        .collect()
}

/// Check if a file extension is a decodable image format
pub fn is_supported_extension(ext: &str) -> bool {
    ImageFormat::from_extension(Path::new(&format!("f.{ext}"))).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbaImage};

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("NAVY.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("NAVY.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("NAVY.png")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("NAVY.BMP")),
            Some(ImageFormat::Bmp)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("NAVY.xyz")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("NAVY")), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("PNG"));
        assert!(!is_supported_extension("pdf"));
    }

    #[test]
    fn test_rgba_is_normalized_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ASH.png");
        let rgba = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 128]));
        rgba.save(&path).unwrap();

        let rgb = load_image(&path).unwrap();
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_zero_byte_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BROKEN.png");
        std::fs::write(&path, b"").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::ImageLoadError { .. }));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = load_image(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, AnalysisError::ImageLoadError { .. }));
    }

    #[test]
    fn test_flatten_row_major() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([1, 2, 3]));
        img.put_pixel(0, 1, Rgb([4, 5, 6]));
        let pixels = flatten(&img);
        assert_eq!(pixels.len(), 4);
        assert_eq!(pixels[1], crate::color::Pixel::new(1, 2, 3));
        assert_eq!(pixels[2], crate::color::Pixel::new(4, 5, 6));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbImage::new(0, 5);
        assert!(matches!(
            ensure_not_empty(&img),
            Err(AnalysisError::EmptyImage { width: 0, height: 5 })
        ));
    }
}
