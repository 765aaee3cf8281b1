// src/error.rs
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised by the amount formatting pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A string expected to be a non-negative decimal numeral was not one.
    #[error("invalid numeric input: {0:?}")]
    InvalidNumericInput(String),
}

impl FormatError {
    pub(crate) fn invalid(input: impl Into<String>) -> Self {
        Self::InvalidNumericInput(input.into())
    }
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No addresses provided")]
    NoAddresses,

    #[error("Too many addresses: {count} requested, at most {max} allowed")]
    TooManyAddresses { count: usize, max: usize },

    #[error("upstream provider error: {0:#}")]
    Upstream(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Upstream(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NoAddresses | ApiError::TooManyAddresses { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
