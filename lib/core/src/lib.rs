//! # SprintSync Core
//!
//! Core library for the SprintSync sprint-tracking service.
//!
//! - [`Vector`] - Dense embedding vector with cosine distance
//! - [`AssignmentEngine`] - Assigns a task to the candidate user whose resume
//!   embedding is nearest to the task description
//! - [`Embedder`] - The embedding provider seam
//! - [`MetricsAggregator`] - Lock-guarded request counters
//!
//! ## Example
//!
//! ```rust
//! use sprintsync_core::{nearest, Candidate, MetricsAggregator, Vector};
//!
//! let task = Vector::new(vec![1.0, 0.0, 0.0]);
//! let candidates = vec![
//!     Candidate::new(1, Vector::new(vec![0.0, 1.0, 0.0])),
//!     Candidate::new(2, Vector::new(vec![0.8, 0.2, 0.0])),
//! ];
//! assert_eq!(nearest(&task, &candidates).unwrap(), Some(2));
//!
//! let metrics = MetricsAggregator::new();
//! metrics.record("/tasks", 12.5, 201);
//! assert_eq!(metrics.snapshot().total_requests, 1);
//! ```

pub mod assignment;
pub mod embedder;
pub mod error;
pub mod metrics;
pub mod vector;

pub use assignment::{nearest, AssignmentEngine, AssignmentOutcome, AssignmentResult, Candidate};
pub use embedder::{Embedder, DEFAULT_EMBEDDING_DIM};
pub use error::{Error, Result};
pub use metrics::{MetricsAggregator, MetricsSnapshot};
pub use vector::Vector;
