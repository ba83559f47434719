//! OCR (Optical Character Recognition) Module
//!
//! Wraps the external Tesseract engine behind [`OcrEngine`]. The engine is
//! treated as a black box: a PNG goes in, UTF-8 text comes out.
//!
//! # Backends
//!
//! - `tesseract-cli` (default): spawns the configured executable as
//!   `tesseract stdin stdout -l <languages>`
//! - `tesseract-lib`: links libtesseract through leptess (cargo feature
//!   `embedded-tesseract`)
//!
//! # Usage
//!
//! ```rust,ignore
//! let engine = OcrEngine::new(&config.ocr);
//! let text = engine.recognize(binary_image).await?;
//! ```

mod engine;

pub use engine::{OcrEngine, ENGINE_CLI, ENGINE_LIB};
