use image::{GrayImage, Luma};

use super::{BinaryImage, RasterImage};
use crate::error::{PixtextError, Result};

/// Threshold passed alongside Otsu selection. Otsu's search replaces it, so it
/// never reaches the output; kept to document the tuned call.
pub const THRESHOLD_HINT: u8 = 200;

/// Value written for pixels above the selected threshold.
pub const MAX_VALUE: u8 = 255;

// BT.601 luma weights in 14-bit fixed point (they sum to 1 << 14).
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Normalize a color image into a dark-on-light-agnostic binary image.
///
/// 1. grayscale with BT.601 weights
/// 2. invert every pixel
/// 3. Otsu threshold, `> t` maps to [`MAX_VALUE`], everything else to 0
pub fn preprocess(image: &RasterImage) -> Result<BinaryImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PixtextError::Preprocess(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let mut gray = to_grayscale(image);
    image::imageops::invert(&mut gray);

    let threshold = otsu_threshold(&gray);
    let binary = apply_threshold(gray, threshold, MAX_VALUE);

    tracing::debug!(
        width = binary.width(),
        height = binary.height(),
        threshold,
        "Image preprocessed"
    );

    Ok(BinaryImage::new(binary, threshold))
}

fn to_grayscale(image: &RasterImage) -> GrayImage {
    let rgb = image.pixels();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Otsu's between-class variance maximization over an 8-bit histogram.
///
/// Returns the first level with the maximal variance. Levels where either
/// class is (numerically) empty are skipped, so a single-valued image yields 0.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = (gray.width() as u64 * gray.height() as u64) as f64;
    let scale = 1.0 / total;

    let mu: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum::<f64>()
        * scale;

    let epsilon = f32::EPSILON as f64;
    let mut q1 = 0.0f64;
    let mut mu1 = 0.0f64;
    let mut max_sigma = 0.0f64;
    let mut best = 0u8;

    for (level, &count) in histogram.iter().enumerate() {
        let p = count as f64 * scale;
        mu1 *= q1;
        q1 += p;
        let q2 = 1.0 - q1;

        if q1.min(q2) < epsilon || q1.max(q2) > 1.0 - epsilon {
            continue;
        }

        mu1 = (mu1 + level as f64 * p) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            best = level as u8;
        }
    }

    best
}

fn apply_threshold(mut gray: GrayImage, threshold: u8, max_value: u8) -> GrayImage {
    for pixel in gray.pixels_mut() {
        pixel[0] = if pixel[0] > threshold { max_value } else { 0 };
    }
    gray
}
