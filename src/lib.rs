//! # SprintSync
//!
//! An internal sprint-tracking API: users, tasks, usage metrics and
//! embedding-based task auto-assignment.
//!
//! When a task is created with a description, the description is embedded and
//! the task is assigned to the user whose resume embedding is nearest by cosine
//! distance. Every HTTP request is timed and folded into an in-process metrics
//! aggregator, readable at `GET /metrics`.
//!
//! ## Quick Start
//!
//! ```bash
//! OPENAI_API_KEY=sk-... sprintsync --http-port 8000 --data-dir ./data
//! # or fully offline
//! sprintsync --embedding-provider hashing --embedding-dim 256
//! ```
//!
//! ## As a Library
//!
//! ```rust
//! use sprintsync::prelude::*;
//!
//! let metrics = MetricsAggregator::new();
//! for latency in [10.0, 20.0, 30.0] {
//!     metrics.record("/tasks", latency, 200);
//! }
//! assert_eq!(metrics.snapshot().average_latency_ms, 20.0);
//! ```
//!
//! ## Crate Structure
//!
//! - `sprintsync-core` - Vectors, the assignment engine, the `Embedder` trait, metrics
//! - `sprintsync-embedding` - OpenAI, hashing and zero-vector providers
//! - `sprintsync-storage` - Users, tasks and JSON snapshots
//! - `sprintsync-api` - actix-web REST API and request-tracking middleware

// Re-export core types
pub use sprintsync_core::{
    nearest, AssignmentEngine, AssignmentOutcome, AssignmentResult, Candidate,
    Embedder, MetricsAggregator, MetricsSnapshot, Vector,
    Error, Result, DEFAULT_EMBEDDING_DIM,
};

// Re-export providers
pub use sprintsync_embedding::{
    build_embedder, HashingEmbedder, OpenAiConfig, OpenAiEmbedder, ProviderKind, ZeroEmbedder,
};

// Re-export storage
pub use sprintsync_storage::{StorageManager, Task, User};

// Re-export API
pub use sprintsync_api::{AppState, EmbeddingFailurePolicy, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AssignmentEngine, AssignmentOutcome, Candidate, Embedder,
        MetricsAggregator, Vector, Error, Result,
        StorageManager, AppState, RestApi,
    };
}
