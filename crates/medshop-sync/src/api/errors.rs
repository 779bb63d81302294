//! Error responses for the HTTP layer
//!
//! Every failure is logged with its cause and answered with a generic body;
//! callers never see the underlying error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::data::CoreError;

/// API Error type for returning standard error responses
#[derive(Debug)]
pub enum ApiError {
    /// Internal server error (500) with a JSON body
    InternalServerError(String),
    /// OAuth callback failure (500) with a plain text body
    OAuthFailed(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::InternalServerError(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::OAuthFailed(msg) => write!(f, "OAuth Failed: {}", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}", self);

        match self {
            ApiError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
            ApiError::OAuthFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error during OAuth process").into_response()
            }
        }
    }
}
