use crate::error::Result;
use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, RgbImage};
use std::time::Instant;

/// Single-channel view of a frame, used for differencing
pub type GrayFrame = GrayImage;

/// A captured color frame tagged with its monotonic capture time
#[derive(Debug, Clone)]
pub struct Frame {
    /// Sequence number assigned by the source
    pub id: u64,
    /// When the frame was captured
    pub timestamp: Instant,
    /// Decoded RGB pixels
    pub image: RgbImage,
}

impl Frame {
    pub fn new(id: u64, timestamp: Instant, image: RgbImage) -> Self {
        Self {
            id,
            timestamp,
            image,
        }
    }

    /// Build a frame from packed RGB24 bytes
    pub fn from_rgb24(
        id: u64,
        timestamp: Instant,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(|image| Self::new(id, timestamp, image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Luma conversion of the frame
    pub fn to_gray(&self) -> GrayFrame {
        image::imageops::grayscale(&self.image)
    }

    /// Encode the frame as JPEG at the given quality (1-100)
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut jpeg_data = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg_data, quality.clamp(1, 100));
        encoder.encode_image(&self.image)?;
        Ok(jpeg_data)
    }

    /// Mean luma, used for the live status line
    pub fn mean_brightness(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let gray = self.to_gray();
        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        total as f64 / (gray.width() as u64 * gray.height() as u64) as f64
    }
}
