//! Photo preparation before upload to the vision model.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::VisionError;
use crate::models::config::VisionConfig;

/// Media type of every prepared image.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// A photo re-encoded for upload.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// JPEG bytes.
    pub data: Vec<u8>,
    pub media_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Read a photo from disk and prepare it for upload.
pub fn prepare_photo(path: &Path, config: &VisionConfig) -> Result<PreparedImage, VisionError> {
    let bytes = std::fs::read(path)?;
    prepare_image_bytes(&bytes, config.max_image_width, config.jpeg_quality)
}

/// Decode an encoded photo, downscale it to `max_width` and re-encode as JPEG.
///
/// Photos narrower than `max_width` keep their size.
pub fn prepare_image_bytes(
    bytes: &[u8],
    max_width: u32,
    quality: u8,
) -> Result<PreparedImage, VisionError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();

    let image = if width > max_width && max_width > 0 {
        let new_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        debug!("Resizing photo from {}x{} to {}x{}", width, height, max_width, new_height);
        image.resize_exact(max_width, new_height, FilterType::Triangle)
    } else {
        image
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let (width, height) = rgb.dimensions();

    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)?;

    debug!("Prepared {}x{} JPEG of {} bytes", width, height, data.len());

    Ok(PreparedImage {
        data,
        media_type: JPEG_MEDIA_TYPE,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 128]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_wide_photo_is_downscaled() {
        let prepared = prepare_image_bytes(&png(2000, 500), 1568, 90).unwrap();

        assert_eq!(prepared.width, 1568);
        assert_eq!(prepared.height, 392);
        assert_eq!(prepared.media_type, "image/jpeg");
        assert_eq!(&prepared.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_narrow_photo_keeps_size() {
        let prepared = prepare_image_bytes(&png(640, 480), 1568, 90).unwrap();

        assert_eq!((prepared.width, prepared.height), (640, 480));
        let decoded = image::load_from_memory(&prepared.data).unwrap();
        assert_eq!(decoded.dimensions(), (640, 480));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = prepare_image_bytes(b"not an image", 1568, 90).unwrap_err();
        assert!(matches!(err, VisionError::Image(_)));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = prepare_photo(Path::new("/nonexistent/photo.jpg"), &VisionConfig::default())
            .unwrap_err();
        assert!(matches!(err, VisionError::Io(_)));
    }
}
