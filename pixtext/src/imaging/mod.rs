//! Image preparation for OCR.
//!
//! The pipeline is split into two pure stages:
//! - [`decoder`] turns an untrusted base64 payload (or a file) into a
//!   [`RasterImage`]
//! - [`preprocess`] turns a [`RasterImage`] into a thresholded [`BinaryImage`]
//!
//! Neither stage keeps any state between calls.

pub mod decoder;
pub mod preprocess;

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, RgbImage};

use crate::error::{PixtextError, Result};

pub use decoder::{
    decode_base64_image, decode_payload, load_image_path, repair_padding, strip_data_uri_prefix,
    DATA_URI_PREFIX,
};
pub use preprocess::preprocess;

/// Three-channel color image as loaded from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbImage,
}

impl RasterImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Single-channel two-level image ready for the OCR engine.
///
/// Every pixel is either `0` or `255`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryImage {
    pixels: GrayImage,
    threshold: u8,
}

impl BinaryImage {
    pub(crate) fn new(pixels: GrayImage, threshold: u8) -> Self {
        Self { pixels, threshold }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Threshold selected by Otsu's method.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Encode as an 8-bit grayscale PNG, the format handed to the OCR engine.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
            .map_err(|e| PixtextError::Unknown(format!("Failed to encode image: {e}")))?;
        Ok(output)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.pixels
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| {
                PixtextError::Unknown(format!("Failed to write {}: {e}", path.display()))
            })
    }
}
