use std::borrow::Cow;
use std::path::Path;

use base64::{engine::general_purpose, Engine};
use image::ImageReader;

use super::RasterImage;
use crate::error::{PixtextError, Result};

/// Data-URI header the browser extension prepends to canvas exports.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Strip a single leading data-URI header, if present.
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    payload.strip_prefix(DATA_URI_PREFIX).unwrap_or(payload)
}

/// Pad a base64 body with `=` up to a multiple of four characters.
///
/// Already-aligned bodies are returned borrowed and untouched.
pub fn repair_padding(body: &str) -> Cow<'_, str> {
    let missing = (4 - body.len() % 4) % 4;
    if missing == 0 {
        return Cow::Borrowed(body);
    }

    let mut padded = String::with_capacity(body.len() + missing);
    padded.push_str(body);
    padded.extend(std::iter::repeat('=').take(missing));
    Cow::Owned(padded)
}

/// Decode an already prefix-stripped base64 body into a color image.
pub fn decode_base64_image(body: &str) -> Result<RasterImage> {
    if body.is_empty() {
        return Err(PixtextError::Decode("image payload is empty".to_string()));
    }

    let padded = repair_padding(body);
    let bytes = general_purpose::STANDARD
        .decode(padded.as_bytes())
        .map_err(|e| PixtextError::Decode(format!("invalid base64 payload: {e}")))?;

    decode_image_bytes(&bytes)
}

/// Strip the data-URI header and decode the remaining body.
pub fn decode_payload(payload: &str) -> Result<RasterImage> {
    decode_base64_image(strip_data_uri_prefix(payload))
}

/// Load an image file from disk.
pub fn load_image_path(path: &Path) -> Result<RasterImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| PixtextError::Decode(format!("failed to read {}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Image loaded from path");
    decode_image_bytes(&bytes)
}

fn decode_image_bytes(bytes: &[u8]) -> Result<RasterImage> {
    if bytes.is_empty() {
        return Err(PixtextError::Decode("decoded image is empty".to_string()));
    }

    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PixtextError::Decode(format!("failed to read image: {e}")))?;

    if reader.format().is_none() {
        return Err(PixtextError::Decode(
            "payload is not a recognized image format".to_string(),
        ));
    }

    let img = reader
        .decode()
        .map_err(|e| PixtextError::Decode(format!("failed to decode image: {e}")))?;

    Ok(RasterImage::new(img.to_rgb8()))
}
