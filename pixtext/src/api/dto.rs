//! Wire types for the public API.
//!
//! ```json
//! POST /convert   { "img": "data:image/png;base64,iVBORw0..." }
//! 200             { "text": "HELLO" }
//! 400 / 422       { "error": "An error occurred while extracting text.", "message": "..." }
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static DATA_URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/png;base64,").expect("data URI pattern is a valid regex")
});

/// Body of `POST /convert`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct ConvertRequest {
    /// PNG screenshot as a data URI.
    #[validate(regex(
        path = *DATA_URI_PATTERN,
        message = "img must be a data URI starting with data:image/png;base64,"
    ))]
    #[schema(example = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAAAAAA6fptVAAAACklEQVR4nGP4DwABAQEAWk1v8QAAAABJRU5ErkJggg==")]
    pub img: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConvertResponse {
    /// Recognized text, trimmed. Empty when the image holds no text.
    pub text: String,
}

/// Failure body shared by every error response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Fixed, human-readable summary.
    pub error: String,
    /// Detail of the underlying failure.
    pub message: String,
}
