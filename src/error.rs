use crate::db::DbError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {message}")]
    Validation { status: StatusCode, message: String },
    #[error("Invalid message id: {0}")]
    InvalidMessageId(String),
    #[error("Message not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Validation { status, message } => {
                tracing::warn!(%status, message = %message, "Rejected request body");
                (status, message)
            }
            Self::InvalidMessageId(raw) => {
                tracing::warn!(message_id = %raw, "Unparseable message id");
                (StatusCode::BAD_REQUEST, "Invalid message id".to_string())
            }
            Self::NotFound => {
                tracing::warn!("Message not found");
                (StatusCode::NOT_FOUND, "Message not found".to_string())
            }
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
