use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrEngine;
use crate::processing::ExtractionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: ExtractionPipeline,
}

impl AppState {
    pub fn new(config: Config, engine: OcrEngine) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: ExtractionPipeline::new(engine),
        }
    }
}
