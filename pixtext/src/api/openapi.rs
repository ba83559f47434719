use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixtext API",
        version = "1.0.0",
        description = "Turns base64 PNG screenshots into text with Tesseract OCR.",
    ),
    paths(
        handlers::convert::convert_image_to_text,
        handlers::health::health_check,
    ),
    components(schemas(
        dto::ConvertRequest,
        dto::ConvertResponse,
        dto::ErrorResponse,
        handlers::health::HealthData,
        handlers::health::EngineStatus,
    )),
    tags(
        (name = "ocr", description = "Image to text conversion"),
        (name = "health", description = "Health check"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
