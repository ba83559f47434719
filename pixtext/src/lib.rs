//! Pixtext: base64 screenshot in, recognized text out.
//!
//! The request path is a short linear pipeline:
//! [`imaging::decoder`] → [`imaging::preprocess`] → [`ocr::OcrEngine`],
//! exposed over HTTP by [`api`] and on the command line by the `pixtext`
//! binary.

pub mod api;
pub mod config;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod ocr;
pub mod processing;

#[cfg(all(test, unix))]
mod test_support;
