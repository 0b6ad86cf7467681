use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sprintsync_storage::StorageError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// The embedding provider failed; the request could not be completed
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sprintsync_core::Error> for ApiError {
    fn from(err: sprintsync_core::Error) -> Self {
        match err {
            sprintsync_core::Error::EmbeddingProvider(msg) => ApiError::EmbeddingProvider(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::EmailTaken(_) => ApiError::BadRequest(err.to_string()),
            StorageError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
            StorageError::TaskNotFound(_) => ApiError::NotFound("Task not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmbeddingProvider(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_server_errors() {
        let provider: ApiError = sprintsync_core::Error::EmbeddingProvider("timeout".into()).into();
        assert_eq!(provider.status_code(), StatusCode::BAD_GATEWAY);

        let mismatch: ApiError = sprintsync_core::Error::DimensionMismatch {
            expected: 4,
            actual: 2,
        }
        .into();
        assert_eq!(mismatch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_errors_map_to_client_errors() {
        let taken: ApiError = StorageError::EmailTaken("a@test.com".into()).into();
        assert_eq!(taken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(taken.to_string(), "Email already registered");

        let missing: ApiError = StorageError::TaskNotFound(3).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "Task not found");
    }
}
