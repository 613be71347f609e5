// Application-level error type and its conversion to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::storage::UploadError;
use crate::supabase::StoreError;

/// Everything a handler can fail with. Each variant maps to a stable,
/// user-facing response; nothing here is fatal to the process.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Upload(UploadError),
    Unauthorized(String),
    InternalServerError(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::Store(error)
    }
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        AppError::Upload(error)
    }
}

// Implement conversion from anyhow::Error for easier error propagation
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::InternalServerError(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(StoreError::NotFound(what)) => {
                tracing::warn!("Not found: {}", what);
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            AppError::Store(StoreError::Validation(detail)) => {
                tracing::warn!("Store rejected a record: {}", detail);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The listing was rejected by the data service.".to_string(),
                )
            }
            AppError::Store(StoreError::Transport(detail)) => {
                tracing::error!("Store transport failure: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    "The data service is unavailable. Please try again.".to_string(),
                )
            }
            AppError::Upload(e) => {
                tracing::error!("Image upload failure: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Image upload failed. Please try again.".to_string(),
                )
            }
            AppError::Unauthorized(message) => {
                tracing::warn!("Unauthorized access attempt: {}", message);
                (StatusCode::UNAUTHORIZED, message)
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                // Don't expose internal details to the client
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        (status, error_message).into_response()
    }
}

// Define a custom Result type using our AppError
pub type AppResult<T> = Result<T, AppError>;
