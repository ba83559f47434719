use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::dto::ErrorResponse;

/// Body `error` value for every failure raised inside the extraction pipeline.
pub const EXTRACTION_FAILED: &str = "An error occurred while extracting text.";

/// Body `error` value for requests rejected by schema validation.
pub const INVALID_REQUEST: &str = "Invalid request body.";

#[derive(Debug, thiserror::Error)]
pub enum PixtextError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Preprocess error: {0}")]
    Preprocess(String),

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl PixtextError {
    /// Stable label for the error class, emitted in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PixtextError::Validation(_) => "validation",
            PixtextError::Decode(_) => "decode",
            PixtextError::Preprocess(_) => "preprocess",
            PixtextError::Engine(_) => "engine",
            PixtextError::Unknown(_) => "unknown",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PixtextError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<tokio::task::JoinError> for PixtextError {
    fn from(err: tokio::task::JoinError) -> Self {
        PixtextError::Unknown(format!("worker task failed: {err}"))
    }
}

impl IntoResponse for PixtextError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            PixtextError::Validation(_) => INVALID_REQUEST,
            PixtextError::Decode(_)
            | PixtextError::Preprocess(_)
            | PixtextError::Engine(_)
            | PixtextError::Unknown(_) => EXTRACTION_FAILED,
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PixtextError>;
