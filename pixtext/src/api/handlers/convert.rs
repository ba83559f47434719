//! `POST /convert`: base64 screenshot in, recognized text out.

use axum::extract::State;
use axum::Json;
use tracing::{error, info, warn};

use crate::api::dto::{ConvertRequest, ConvertResponse, ErrorResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::error::PixtextError;
use crate::imaging::strip_data_uri_prefix;

/// `POST /convert`
///
/// Every pipeline failure (decode, preprocess, engine) is reported with the
/// same 400 body; the error kind only reaches the log.
#[utoipa::path(
    post,
    path = "/convert",
    tag = "ocr",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Text extracted", body = ConvertResponse),
        (status = 400, description = "The image could not be processed", body = ErrorResponse),
        (status = 422, description = "Request body failed validation", body = ErrorResponse),
    )
)]
pub async fn convert_image_to_text(
    State(state): State<AppState>,
    payload: Result<ValidatedJson<ConvertRequest>, PixtextError>,
) -> Result<Json<ConvertResponse>, PixtextError> {
    let ValidatedJson(req) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "Request rejected");
            return Err(err);
        }
    };

    let body = strip_data_uri_prefix(&req.img).to_string();

    match state.pipeline.extract_base64(body).await {
        Ok(text) => {
            info!(chars = text.len(), "Text extracted successfully");
            Ok(Json(ConvertResponse { text }))
        }
        Err(err) => {
            error!(kind = err.kind(), error = %err, "An error occurred while extracting text");
            Err(err)
        }
    }
}
