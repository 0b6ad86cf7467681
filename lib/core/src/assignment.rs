//! Task auto-assignment by embedding similarity
//!
//! A new task's description is embedded once and compared against the resume
//! embeddings of every candidate user with a linear scan. The candidate with
//! the smallest cosine distance wins; ties go to the earliest candidate in
//! input order.

use crate::embedder::Embedder;
use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A user eligible for assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: i64,
    pub embedding: Vector,
}

impl Candidate {
    pub fn new(id: i64, embedding: Vector) -> Self {
        Self { id, embedding }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentResult {
    pub assigned_id: Option<i64>,
}

/// What happened when a task was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "user_id", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// The task had no description, or the provider failed under a lenient policy
    #[default]
    NotAttempted,
    /// Assignment ran but no candidate matched
    NoMatch,
    Assigned(i64),
}

impl AssignmentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentOutcome::NotAttempted => "not_attempted",
            AssignmentOutcome::NoMatch => "no_match",
            AssignmentOutcome::Assigned(_) => "assigned",
        }
    }

    pub fn assigned_id(&self) -> Option<i64> {
        match self {
            AssignmentOutcome::Assigned(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<AssignmentResult> for AssignmentOutcome {
    fn from(result: AssignmentResult) -> Self {
        match result.assigned_id {
            Some(id) => AssignmentOutcome::Assigned(id),
            None => AssignmentOutcome::NoMatch,
        }
    }
}

/// Select the candidate nearest to `query` by cosine distance.
///
/// Zero-magnitude candidates are skipped. A candidate whose dimension differs
/// from the query is an error, even if another candidate already matched.
pub fn nearest(query: &Vector, candidates: &[Candidate]) -> Result<Option<i64>> {
    let mut best: Option<(i64, f64)> = None;

    for candidate in candidates {
        if candidate.embedding.dim() != query.dim() {
            return Err(Error::DimensionMismatch {
                expected: query.dim(),
                actual: candidate.embedding.dim(),
            });
        }

        let distance = match query.cosine_distance(&candidate.embedding) {
            Some(d) if !d.is_nan() => d,
            _ => continue,
        };

        // strict `<` keeps the first candidate on ties
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate.id, distance)),
        }
    }

    Ok(best.map(|(id, _)| id))
}

/// Assigns tasks to the candidate whose embedding is nearest to the task text
pub struct AssignmentEngine<E> {
    embedder: E,
    dimension: usize,
}

impl<E: Embedder> AssignmentEngine<E> {
    /// Create an engine expecting vectors of the embedder's own dimension
    pub fn new(embedder: E) -> Self {
        let dimension = embedder.dimension();
        Self { embedder, dimension }
    }

    /// Create an engine that enforces a specific dimension
    pub fn with_dimension(embedder: E, dimension: usize) -> Self {
        Self { embedder, dimension }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Embed `text` once and pick the nearest candidate.
    ///
    /// Callers skip this entirely when the task has no description.
    pub async fn assign(&self, text: &str, candidates: &[Candidate]) -> Result<AssignmentResult> {
        let task_embedding = self.embed(text).await?;
        let assigned_id = nearest(&task_embedding, candidates)?;

        debug!(
            provider = self.embedder.name(),
            candidates = candidates.len(),
            assigned_id = ?assigned_id,
            "assignment evaluated"
        );

        Ok(AssignmentResult { assigned_id })
    }

    /// Embed arbitrary text (e.g. a resume) and check its dimension
    pub async fn embed(&self, text: &str) -> Result<Vector> {
        let vector = self.embedder.embed(text).await?;
        if vector.dim() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dim(),
            });
        }
        Ok(vector)
    }
}
