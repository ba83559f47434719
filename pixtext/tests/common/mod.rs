#![allow(dead_code)]

use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::Request;
use base64::{engine::general_purpose, Engine};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use pixtext::api::AppState;
use pixtext::config::{Config, LoggingConfig, OcrConfig, ServerConfig};
use pixtext::ocr::OcrEngine;

const ETXTBSY: i32 = 26;

/// Write an executable shell script standing in for `tesseract`.
pub fn write_stub_engine(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("tesseract");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 'tesseract 5.3.0-stub'; exit 0; fi\n{body}\n"
    );
    std::fs::write(&path, script).expect("Failed to write stub engine");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark stub engine executable");

    for _ in 0..100 {
        match std::process::Command::new(&path).arg("--version").output() {
            Err(e) if e.raw_os_error() == Some(ETXTBSY) => {
                std::thread::sleep(std::time::Duration::from_millis(10))
            }
            _ => break,
        }
    }
    path
}

pub fn test_config(ocr: OcrConfig) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_bytes: 20 * 1024 * 1024,
        },
        ocr,
        logging: LoggingConfig {
            directory: std::env::temp_dir(),
            file_name: "pixtext-integration.log".to_string(),
            level: "pixtext=debug".to_string(),
        },
    }
}

pub fn state_with_engine(ocr: OcrConfig) -> AppState {
    let engine = OcrEngine::new(&ocr);
    AppState::new(test_config(ocr), engine)
}

/// State whose engine is the stub script at `executable`.
pub fn stub_state(executable: &Path) -> AppState {
    state_with_engine(OcrConfig {
        executable_path: executable.to_string_lossy().into_owned(),
        timeout_secs: 10,
        ..OcrConfig::default()
    })
}

/// Dark bar on a light page; `bar` shifts the bar so images differ.
pub fn page_with_bar(width: u32, height: u32, bar: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if x >= bar && x < bar + 4 && y > 2 && y + 2 < height {
            Rgb([15, 15, 15])
        } else {
            Rgb([240, 240, 240])
        }
    }))
}

pub fn png_data_uri(img: &DynamicImage) -> String {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .expect("Failed to encode PNG");
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(output)
    )
}

pub fn convert_request(img: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "img": img }).to_string()))
        .expect("Failed to build request")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
