#![cfg(unix)]

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use common::*;
use pixtext::api::create_router;
use pixtext::config::OcrConfig;

// Echo a checksum of the PNG received on stdin so each distinct image maps
// to a distinct, reproducible "recognized" text.
const CHECKSUM_ENGINE: &str = "cksum | cut -d' ' -f1";

#[tokio::test]
async fn test_convert_returns_recognized_text() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub_engine(dir.path(), "cat > /dev/null\nprintf '  HELLO\\n\\n'");
    let app = create_router(stub_state(&stub));

    let response = app
        .oneshot(convert_request(&png_data_uri(&page_with_bar(120, 40, 20))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "text": "HELLO" }));
}

#[tokio::test]
async fn test_convert_accepts_unpadded_payload() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub_engine(dir.path(), "cat > /dev/null\necho padded");
    let app = create_router(stub_state(&stub));

    let uri = png_data_uri(&page_with_bar(33, 17, 5));
    let unpadded = uri.trim_end_matches('=');

    let response = app.oneshot(convert_request(unpadded)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["text"], "padded");
}

#[tokio::test]
async fn test_convert_rejects_invalid_base64() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub_engine(dir.path(), "cat > /dev/null\necho never");
    let app = create_router(stub_state(&stub));

    let response = app
        .oneshot(convert_request("data:image/png;base64,####"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "An error occurred while extracting text.");
    assert!(json["message"].as_str().unwrap().starts_with("Decode error"));
}

#[tokio::test]
async fn test_convert_rejects_empty_body_after_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub_engine(dir.path(), "cat > /dev/null\necho never");
    let app = create_router(stub_state(&stub));

    let response = app
        .oneshot(convert_request("data:image/png;base64,"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "An error occurred while extracting text."
    );
}

#[tokio::test]
async fn test_convert_reports_missing_engine() {
    let app = create_router(state_with_engine(OcrConfig {
        executable_path: "/nonexistent/pixtext/tesseract".to_string(),
        ..OcrConfig::default()
    }));

    let response = app
        .oneshot(convert_request(&png_data_uri(&page_with_bar(40, 20, 8))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "An error occurred while extracting text.");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("OCR engine error"));
}

#[tokio::test]
async fn test_convert_reports_engine_crash() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub_engine(
        dir.path(),
        "cat > /dev/null\necho 'Error in pixReadMem' >&2\nexit 1",
    );
    let app = create_router(stub_state(&stub));

    let response = app
        .oneshot(convert_request(&png_data_uri(&page_with_bar(40, 20, 8))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("pixReadMem"), "message: {message}");
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub_engine(dir.path(), CHECKSUM_ENGINE);
    let app = create_router(stub_state(&stub));

    let payloads: Vec<String> = (0..8)
        .map(|i| png_data_uri(&page_with_bar(64 + i, 24, 4 + i * 5)))
        .collect();

    let mut expected = Vec::new();
    for payload in &payloads {
        let response = app.clone().oneshot(convert_request(payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        expected.push(body_json(response).await["text"].clone());
    }

    let mut deduped = expected.clone();
    deduped.sort_by_key(|v| v.to_string());
    deduped.dedup();
    assert_eq!(deduped.len(), payloads.len(), "stub output should differ per image");

    let handles: Vec<_> = payloads
        .iter()
        .cloned()
        .map(|payload| {
            let app = app.clone();
            tokio::spawn(async move {
                let response = app.oneshot(convert_request(&payload)).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                body_json(response).await["text"].clone()
            })
        })
        .collect();

    for (handle, want) in handles.into_iter().zip(expected) {
        assert_eq!(handle.await.unwrap(), want);
    }
}

#[tokio::test]
#[ignore = "requires tesseract on PATH"]
async fn test_real_engine_blank_image_yields_empty_text() {
    let app = create_router(state_with_engine(OcrConfig::default()));
    let blank = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        100,
        40,
        image::Rgb([255, 255, 255]),
    ));

    let response = app.oneshot(convert_request(&png_data_uri(&blank))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "text": "" }));
}
