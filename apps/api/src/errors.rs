use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::letters::store::Unsupported;
use crate::llm_client::LlmError;

pub const GENERATION_FAILED_TITLE: &str = "Generation Failed";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate cover letter. Please check your API key and try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is recoverable: the operation that raised it made no state
/// change and the user may retry.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{title}: {message}")]
    Validation { title: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Unsupported action '{action}' for letter {id}")]
    Unsupported { action: String, id: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(title: &str, message: &str) -> Self {
        AppError::Validation {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<Unsupported> for AppError {
    fn from(gap: Unsupported) -> Self {
        AppError::Unsupported {
            action: gap.action.as_str().to_string(),
            id: gap.id,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, title, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", "Not Found", msg.clone()),
            AppError::Validation { title, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                title.as_str(),
                message.clone(),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "GENERATION_IN_PROGRESS",
                "Generation In Progress",
                msg.clone(),
            ),
            AppError::Generation(e) => {
                tracing::error!("Error generating cover letter: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    GENERATION_FAILED_TITLE,
                    GENERATION_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Cancelled => (
                StatusCode::CONFLICT,
                "GENERATION_CANCELLED",
                "Generation Cancelled",
                "The cover letter form was closed before generation finished.".to_string(),
            ),
            AppError::Unsupported { action, id } => (
                StatusCode::NOT_IMPLEMENTED,
                "UNSUPPORTED",
                "Not Supported",
                format!("Cannot {action} cover letter {id}: this action is not supported yet"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal Error",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "title": title,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
