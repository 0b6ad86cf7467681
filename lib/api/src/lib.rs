//! # SprintSync API
//!
//! actix-web REST surface: users, tasks, stats, AI suggestions and the
//! `/metrics` read endpoint. Every request passes through
//! [`middleware::track_requests`], which feeds the metrics aggregator.

pub mod auth;
pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod suggest;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use error::{ApiError, ApiResult};
pub use middleware::track_requests;
pub use rest::{configure, RestApi};
pub use state::{AppState, EmbeddingFailurePolicy};
