use sprintsync_core::{AssignmentEngine, Embedder};
use sprintsync_storage::StorageManager;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What task creation does when the embedding provider fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingFailurePolicy {
    /// Fail the request with a server error; nothing is stored
    #[default]
    Fail,
    /// Store the task with assignment `not_attempted`
    StoreUnassigned,
}

impl FromStr for EmbeddingFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(EmbeddingFailurePolicy::Fail),
            "store-unassigned" | "store_unassigned" => Ok(EmbeddingFailurePolicy::StoreUnassigned),
            other => Err(format!(
                "unknown embedding failure policy '{}' (expected fail or store-unassigned)",
                other
            )),
        }
    }
}

impl fmt::Display for EmbeddingFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingFailurePolicy::Fail => write!(f, "fail"),
            EmbeddingFailurePolicy::StoreUnassigned => write!(f, "store-unassigned"),
        }
    }
}

/// Shared state handed to every handler
pub struct AppState {
    pub storage: Arc<StorageManager>,
    pub engine: AssignmentEngine<Arc<dyn Embedder>>,
    pub failure_policy: EmbeddingFailurePolicy,
}

impl AppState {
    pub fn new(
        storage: Arc<StorageManager>,
        engine: AssignmentEngine<Arc<dyn Embedder>>,
        failure_policy: EmbeddingFailurePolicy,
    ) -> Self {
        Self {
            storage,
            engine,
            failure_policy,
        }
    }
}
