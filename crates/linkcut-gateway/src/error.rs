use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use linkcut_core::StorageError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Handler-level failure, translated into an HTTP response.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Storage(StorageError),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Storage(StorageError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "there is no url with this id").into_response()
            }
            AppError::Storage(StorageError::NoContent(_)) => {
                StatusCode::NO_CONTENT.into_response()
            }
            AppError::Storage(err) => {
                error!(error = %err, "storage operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage operation failed").into_response()
            }
        }
    }
}
