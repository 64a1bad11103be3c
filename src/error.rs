use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Contact errors
    #[error("Contact not found")]
    ContactNotFound,

    // Validation errors
    #[error("{0}")]
    Validation(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ContactNotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            // 400 Bad Request
            AppError::Validation(msg) => json!({
                "success": false,
                "message": msg,
            }),

            // 404 Not Found
            AppError::ContactNotFound => json!({
                "success": false,
                "message": self.to_string(),
            }),

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                json!({
                    "success": false,
                    "message": "Server Error",
                    "error": e.to_string(),
                })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                json!({
                    "success": false,
                    "message": "Server Error",
                    "error": e.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
