use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap any provider-side failure (network, quota, decoding)
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Error::EmbeddingProvider(err.to_string())
    }
}
