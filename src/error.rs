use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn shopcart_not_found(shopcart_id: i32) -> Self {
        Self::NotFound(format!(
            "Shopcart with id '{shopcart_id}' was not found."
        ))
    }

    pub fn item_not_found(item_id: i32) -> Self {
        Self::NotFound(format!("Item with id '{item_id}' was not found."))
    }
}

/// Uniform error envelope carried by every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::MethodNotAllowed(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not Allowed")
            }
            AppError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type")
            }
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %message, "request rejected");
        }

        let body = ErrorBody {
            status: status.as_u16(),
            error: error.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
