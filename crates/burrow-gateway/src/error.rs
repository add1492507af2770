use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_shortener::ShortenerError;
use tracing::{debug, error};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request body could not be read as a shorten request.
    BadRequest(String),
    /// A failure inside the gateway itself, such as an unsendable redirect target.
    Internal(String),
    Shortener(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        AppError::Shortener(err)
    }
}

const INVALID_URL: &str = "invalid url";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(reason) => {
                debug!(reason = %reason, "rejected shorten request body");
                (StatusCode::BAD_REQUEST, INVALID_URL)
            }
            AppError::Shortener(ShortenerError::InvalidUrl(_)) => {
                (StatusCode::BAD_REQUEST, INVALID_URL)
            }
            AppError::Shortener(ShortenerError::NotFound(_)) => (StatusCode::NOT_FOUND, INVALID_URL),
            AppError::Internal(reason) => {
                error!(reason = %reason, "request failed inside the gateway");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            // Logged by the allocator.
            AppError::Shortener(ShortenerError::AllocationExhausted { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "short code space exhausted")
            }
            AppError::Shortener(ShortenerError::Storage(err)) => {
                error!(error = %err, "storage failure while serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
