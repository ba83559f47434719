use std::path::Path;

use crate::error::Result;
use crate::imaging::{self, BinaryImage, RasterImage};
use crate::ocr::OcrEngine;

/// Decode → preprocess → recognize, shared by the HTTP handler and the CLI.
///
/// Decoding and thresholding are CPU-bound and run on the blocking pool so a
/// large screenshot does not stall other requests on the same worker.
#[derive(Clone)]
pub struct ExtractionPipeline {
    engine: OcrEngine,
}

impl ExtractionPipeline {
    pub fn new(engine: OcrEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &OcrEngine {
        &self.engine
    }

    /// Extract text from a base64 body whose data-URI header is already stripped.
    pub async fn extract_base64(&self, body: String) -> Result<String> {
        let binary = self.prepare_base64(body).await?;
        self.engine.recognize(binary).await
    }

    /// Extract text from an image file on disk.
    pub async fn extract_path(&self, path: &Path) -> Result<String> {
        let binary = self.prepare_path(path).await?;
        self.engine.recognize(binary).await
    }

    pub async fn prepare_base64(&self, body: String) -> Result<BinaryImage> {
        tokio::task::spawn_blocking(move || {
            let raster = imaging::decode_base64_image(&body)?;
            prepare(raster)
        })
        .await?
    }

    pub async fn prepare_path(&self, path: &Path) -> Result<BinaryImage> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let raster = imaging::load_image_path(&path)?;
            prepare(raster)
        })
        .await?
    }
}

fn prepare(raster: RasterImage) -> Result<BinaryImage> {
    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        "Image decoded"
    );
    imaging::preprocess(&raster)
}
