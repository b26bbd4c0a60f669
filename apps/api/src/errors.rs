use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::providers::GenerationError;

/// Summary returned to clients for every failed generation.
pub const GENERATION_FAILED: &str = "Failed to generate CV and cover letter";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                e.to_string()
            }
        };

        let body = Json(json!({
            "error": GENERATION_FAILED,
            "details": details,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
