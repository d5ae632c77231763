//! API errors and their HTTP mapping.
//!
//! Every error leaves the server as `{ "error": message }` with a status that
//! tells the client whether to fix the request, wait, or retry later.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use glossa_core::{ExtractionError, FetchError, GlossaError, LookupError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or one of its fields is unusable.
    #[error("{0}")]
    BadRequest(String),

    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Extraction(ExtractionError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Fetch(FetchError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::Lookup(LookupError::EmptyInput) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Lookup(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<GlossaError> for ApiError {
    fn from(error: GlossaError) -> Self {
        match error {
            GlossaError::Extraction(e) => ApiError::Extraction(e),
            GlossaError::Fetch(e) => ApiError::Fetch(e),
            GlossaError::Lookup(e) => ApiError::Lookup(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed upstream");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
