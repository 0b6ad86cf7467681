//! Embedding provider abstraction
//!
//! The assignment engine never computes embeddings itself. It consumes an
//! [`Embedder`], which may call a remote model (OpenAI), hash text locally, or
//! return a fixed vector in CI. Retries, if any, live in the implementation.

use crate::{Result, Vector};
use async_trait::async_trait;
use std::sync::Arc;

/// Default embedding dimension (matches `text-embedding-3-small`)
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Compute the embedding of `text`.
    ///
    /// Failures surface as [`crate::Error::EmbeddingProvider`].
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// The dimension of vectors produced by this embedder
    fn dimension(&self) -> usize;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    async fn embed(&self, text: &str) -> Result<Vector> {
        (**self).embed(text).await
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
