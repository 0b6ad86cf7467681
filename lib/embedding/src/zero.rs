use async_trait::async_trait;
use sprintsync_core::{Embedder, Result, Vector};

/// Returns the zero vector for every input. Zero vectors match no candidate,
/// so tasks created under this provider always end up unassigned.
#[derive(Debug, Clone)]
pub struct ZeroEmbedder {
    dim: usize,
}

impl ZeroEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for ZeroEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Ok(Vector::zeros(self.dim))
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "zero"
    }
}
