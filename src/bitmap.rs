//! Bitmap codec and resizing shared by every renderer

use crate::error::{Error, Result};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Downscale `image` so its larger side fits within `max_dimension`.
///
/// Aspect ratio is preserved and images are never enlarged. With no bound,
/// or when the image already fits, the input is returned untouched.
pub fn resize_to_fit(image: DynamicImage, max_dimension: Option<u32>) -> DynamicImage {
    let Some(max_dim) = max_dimension else {
        return image;
    };

    let (width, height) = image.dimensions();
    if width.max(height) <= max_dim {
        return image;
    }

    let (new_width, new_height) = fit_dimensions(width, height, max_dim);
    tracing::debug!(
        width,
        height,
        new_width,
        new_height,
        "Downscaling bitmap"
    );
    image.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Target size for a `width`x`height` bitmap whose larger side becomes `max_dim`.
fn fit_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let scale = |side: u32, long: u32| -> u32 {
        let scaled = (side as f64 * max_dim as f64 / long as f64).round() as u32;
        scaled.clamp(1, max_dim)
    };

    if width >= height {
        (max_dim, scale(height, width))
    } else {
        (scale(width, height), max_dim)
    }
}

/// Decode an in-memory image, detecting the format from its content.
pub fn decode_bytes(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(data)?)
}

/// Decode an image file, detecting the format from its content.
pub fn decode_path<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image)
}

/// Map a format name such as `"png"` or `"jpg"` to its canonical tag and codec.
pub fn output_format(name: &str) -> Result<(String, ImageFormat)> {
    let tag = match name.trim().to_ascii_lowercase().as_str() {
        "jpg" => "jpeg".to_string(),
        other => other.to_string(),
    };

    match ImageFormat::from_extension(&tag) {
        Some(format) if format.writing_enabled() => Ok((tag, format)),
        _ => Err(Error::UnsupportedOutputFormat { format: tag }),
    }
}

/// Output format for an image MIME type, using its subtype (`image/jpg` -> `jpeg`).
pub fn output_format_for_mime(mime_type: &str) -> Result<(String, ImageFormat)> {
    let subtype = mime_type.rsplit('/').next().unwrap_or(mime_type);
    output_format(subtype)
}

/// Encode a bitmap with the given codec.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    // JPEG has no alpha channel
    if format == ImageFormat::Jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut Cursor::new(&mut bytes), format)?;
    } else {
        image.write_to(&mut Cursor::new(&mut bytes), format)?;
    }

    Ok(bytes)
}

/// Encode a bitmap as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    encode(image, ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use rstest::rstest;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn test_resize_without_bound_is_identity() {
        let resized = resize_to_fit(solid(640, 480), None);
        assert_eq!(resized.dimensions(), (640, 480));
    }

    #[rstest]
    #[case(640, 480, 640)]
    #[case(640, 480, 1000)]
    #[case(1, 1, 1)]
    fn test_resize_within_bound_is_identity(
        #[case] width: u32,
        #[case] height: u32,
        #[case] bound: u32,
    ) {
        let resized = resize_to_fit(solid(width, height), Some(bound));
        assert_eq!(resized.dimensions(), (width, height));
    }

    #[rstest]
    #[case(800, 600, 400, (400, 300))]
    #[case(600, 800, 400, (300, 400))]
    #[case(1000, 1000, 250, (250, 250))]
    #[case(1000, 333, 100, (100, 33))]
    #[case(3000, 2, 100, (100, 1))]
    fn test_resize_downscales_larger_side_to_bound(
        #[case] width: u32,
        #[case] height: u32,
        #[case] bound: u32,
        #[case] expected: (u32, u32),
    ) {
        let resized = resize_to_fit(solid(width, height), Some(bound));
        assert_eq!(resized.dimensions(), expected);
    }

    #[test]
    fn test_resize_preserves_aspect_ratio_within_rounding() {
        let (w, h) = (1237u32, 853u32);
        let resized = resize_to_fit(solid(w, h), Some(500));
        let (nw, nh) = resized.dimensions();
        assert_eq!(nw, 500);
        let expected_h = h as f64 * 500.0 / w as f64;
        assert!((nh as f64 - expected_h).abs() <= 1.0);
    }

    #[rstest]
    #[case("png", "png", ImageFormat::Png)]
    #[case("jpg", "jpeg", ImageFormat::Jpeg)]
    #[case("JPEG", "jpeg", ImageFormat::Jpeg)]
    #[case("gif", "gif", ImageFormat::Gif)]
    fn test_output_format_aliases(
        #[case] name: &str,
        #[case] tag: &str,
        #[case] format: ImageFormat,
    ) {
        let (t, f) = output_format(name).unwrap();
        assert_eq!(t, tag);
        assert_eq!(f, format);
    }

    #[test]
    fn test_output_format_for_mime_uses_subtype() {
        let (tag, format) = output_format_for_mime("image/jpg").unwrap();
        assert_eq!(tag, "jpeg");
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_output_format_unknown() {
        let result = output_format_for_mime("image/x-unknown");
        assert!(matches!(
            result,
            Err(Error::UnsupportedOutputFormat { .. })
        ));
    }

    #[test]
    fn test_encode_then_decode_keeps_dimensions() {
        let original = solid(37, 21);
        let png = encode_png(&original).unwrap();
        assert_eq!(&png[1..4], b"PNG".as_slice());
        let decoded = decode_bytes(&png).unwrap();
        assert_eq!(decoded.dimensions(), (37, 21));
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let jpeg = encode(&solid(16, 16), ImageFormat::Jpeg).unwrap();
        assert_eq!(jpeg[0..2], [0xFFu8, 0xD8]);
        let decoded = decode_bytes(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_bytes(b"definitely not an image"),
            Err(Error::Image(_))
        ));
    }

    #[test]
    fn test_decode_missing_path_is_io_error() {
        assert!(matches!(
            decode_path("/nonexistent/picture.png"),
            Err(Error::Io(_))
        ));
    }
}
