//! Camera frames as seen by the pipeline.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::{SpatialError, SpatialResult};

/// Longest side of a processed frame.
pub const DEFAULT_MAX_DIMENSION: u32 = 640;

/// JPEG quality used when a frame leaves the process.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// A decoded still image. Detector boxes are expressed in its pixel space.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode a frame from an image file.
    pub fn open(path: impl AsRef<Path>) -> SpatialResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SpatialError::FrameNotFound(path.to_path_buf()));
        }
        let image = image::open(path)?;
        Self::checked(image)
    }

    /// Decode a frame from encoded bytes (JPEG, PNG).
    pub fn from_bytes(bytes: &[u8]) -> SpatialResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Self::checked(image)
    }

    fn checked(image: DynamicImage) -> SpatialResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SpatialError::invalid_frame(format!(
                "empty image {}x{}",
                width, height
            )));
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Shrink the frame so neither side exceeds `max_dimension`.
    ///
    /// Aspect ratio is preserved and the scaled sides are rounded. Frames
    /// already within bounds are returned unchanged.
    pub fn downscaled(self, max_dimension: u32) -> Self {
        let (width, height) = self.image.dimensions();
        if max_dimension == 0 || (width <= max_dimension && height <= max_dimension) {
            return self;
        }

        let (new_width, new_height) = scaled_dimensions(width, height, max_dimension);
        debug!(width, height, new_width, new_height, "Downscaling frame");

        Self {
            image: self
                .image
                .resize_exact(new_width, new_height, FilterType::Triangle),
        }
    }

    /// Encode the frame as baseline JPEG.
    pub fn encode_jpeg(&self, quality: u8) -> SpatialResult<Vec<u8>> {
        let rgb = self.image.to_rgb8();
        let mut buffer = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).encode_image(&rgb)?;
        Ok(buffer.into_inner())
    }
}

fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let scale = f64::min(
        f64::from(max_dimension) / f64::from(width),
        f64::from(max_dimension) / f64::from(height),
    );
    let new_width = (f64::from(width) * scale).round().max(1.0) as u32;
    let new_height = (f64::from(height) * scale).round().max(1.0) as u32;
    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> Frame {
        Frame::new(DynamicImage::new_rgb8(width, height))
    }

    #[test]
    fn test_downscale_landscape() {
        let frame = blank(1280, 720).downscaled(DEFAULT_MAX_DIMENSION);
        assert_eq!((frame.width(), frame.height()), (640, 360));
    }

    #[test]
    fn test_downscale_portrait_rounds() {
        let frame = blank(1000, 3000).downscaled(DEFAULT_MAX_DIMENSION);
        assert_eq!((frame.width(), frame.height()), (213, 640));
    }

    #[test]
    fn test_small_frame_untouched() {
        let frame = blank(320, 240).downscaled(DEFAULT_MAX_DIMENSION);
        assert_eq!((frame.width(), frame.height()), (320, 240));
    }

    #[test]
    fn test_jpeg_roundtrip_dimensions() {
        let frame = blank(64, 48);
        let bytes = frame.encode_jpeg(DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = Frame::from_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(Frame::from_bytes(b"not an image").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Frame::open("/nonexistent/frame.jpg").unwrap_err();
        assert!(matches!(err, SpatialError::FrameNotFound(_)));
    }
}
