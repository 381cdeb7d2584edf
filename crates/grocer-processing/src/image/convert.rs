//! HEIC → JPEG conversion for display.

use bytes::Bytes;
use grocer_core::AppError;
use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, ImageReader};
use std::io::Cursor;

/// A re-encoded image ready for display.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub data: Bytes,
    pub content_type: String,
}

/// Converts an image blob into a displayable raster format.
///
/// The codec is opaque to the workflow: it either returns the converted bytes
/// or a conversion error, and the caller falls back to the original.
pub trait ImageConverter: Send + Sync {
    fn convert(&self, data: &[u8], source_content_type: &str)
        -> Result<ConvertedImage, AppError>;
}

/// Re-encodes anything the `image` crate can decode as JPEG.
///
/// HEIF containers are not among the decoders compiled into `image`, so HEIC
/// input fails with [`AppError::Conversion`] unless a HEIF-capable converter
/// is supplied in its place.
#[derive(Debug, Clone, Copy)]
pub struct JpegConverter {
    quality: u8,
}

impl JpegConverter {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegConverter {
    fn default() -> Self {
        Self::new(80)
    }
}

impl ImageConverter for JpegConverter {
    fn convert(
        &self,
        data: &[u8],
        source_content_type: &str,
    ) -> Result<ConvertedImage, AppError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| AppError::Conversion(format!("Failed to read image: {}", e)))?;

        if reader.format().is_none() {
            return Err(AppError::Conversion(format!(
                "No decoder available for {}",
                source_content_type
            )));
        }

        let img = reader
            .decode()
            .map_err(|e| AppError::Conversion(format!("Failed to decode image: {}", e)))?;

        let (width, height) = img.dimensions();
        let rgb = img.to_rgb8();
        let mut buffer = Vec::with_capacity(jpeg_capacity_hint(width, height));
        JpegEncoder::new_with_quality(&mut buffer, self.quality)
            .encode_image(&rgb)
            .map_err(|e| AppError::Conversion(format!("Failed to encode JPEG: {}", e)))?;

        tracing::debug!(
            source = %source_content_type,
            width = width,
            height = height,
            quality = self.quality,
            "Converted image to JPEG"
        );

        Ok(ConvertedImage {
            data: Bytes::from(buffer),
            content_type: "image/jpeg".to_string(),
        })
    }
}

/// Initial output buffer size for a `width` x `height` JPEG, capped at 16 MiB.
fn jpeg_capacity_hint(width: u32, height: u32) -> usize {
    const MAX_HINT: usize = 16 * 1024 * 1024;
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_div(4)
        .min(MAX_HINT)
}

/// Image dimensions, when the contents can be decoded.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    reader.into_dimensions().ok()
}
