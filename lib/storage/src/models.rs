use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sprintsync_core::{AssignmentOutcome, Vector};

pub const DEFAULT_STATUS: &str = "TODO";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume_embedding: Option<Vector>,
}

impl User {
    pub fn has_embedding(&self) -> bool {
        self.resume_embedding.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub total_minutes: i64,
    /// Owner (creator) of the task
    pub user_id: i64,
    #[serde(default)]
    pub assignment: AssignmentOutcome,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn assigned_user_id(&self) -> Option<i64> {
        self.assignment.assigned_id()
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub total_minutes: i64,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: DEFAULT_STATUS.to_string(),
            total_minutes: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub total_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopUser {
    pub user_id: i64,
    pub email: String,
    pub total_minutes: i64,
}
