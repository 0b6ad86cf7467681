use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Email already registered")]
    EmailTaken(String),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
