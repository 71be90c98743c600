//! Task identity and creation metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single unit of work handed to the pipeline.
///
/// Created once per run and immutable thereafter; retention is a store
/// concern, the core never deletes a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque unique identifier, assigned at creation.
    pub task_id: Uuid,

    /// The task description as entered by the user. May be empty; the core
    /// forwards it untouched and leaves judgement to the generation
    /// capability.
    pub description: String,

    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task for the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}
