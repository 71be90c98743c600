//! Storage trait definitions for DevCrew
//!
//! `TaskStore` is the single abstraction the orchestration core writes
//! through. Guarantees every backend must uphold:
//!
//! - A task row is created once and never mutated or deleted.
//! - Artifact writes are append-only; re-recording adds a new row rather
//!   than overwriting.
//! - `fetch_summary` returns the most recently recorded summary.
//!
//! All trait methods are async and backend-agnostic. An in-memory fake is
//! provided for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Unique identifier for a stored task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a new random TaskId
    pub fn new() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored task row: identity, description, creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRow {
    pub task_id: TaskId,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Durable, append-only task store.
///
/// The orchestration core writes through this trait only after a complete
/// `ExecutionResult` exists; backends never see a half-finished run.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a new task row, returning its unique ID.
    async fn create_task(&self, description: &str) -> StoreResult<TaskId>;

    /// Record the generated artifact for a task.
    async fn record_artifact(&self, task_id: &TaskId, artifact: &str) -> StoreResult<()>;

    /// Record the validation report for a task.
    async fn record_validation(
        &self,
        task_id: &TaskId,
        report: serde_json::Value,
    ) -> StoreResult<()>;

    /// Record the deployment status for a task.
    async fn record_deployment(
        &self,
        task_id: &TaskId,
        status: serde_json::Value,
    ) -> StoreResult<()>;

    /// Record the final summary for a task.
    async fn record_summary(&self, task_id: &TaskId, summary: serde_json::Value)
        -> StoreResult<()>;

    /// Fetch the most recent summary for a task, if one was recorded.
    async fn fetch_summary(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>>;

    /// Fetch the most recent validation report for a task, if one was recorded.
    async fn fetch_validation(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>>;

    /// Fetch the most recent deployment status for a task, if one was recorded.
    async fn fetch_deployment(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>>;

    /// Fetch the most recent artifact for a task, if one was recorded.
    async fn fetch_artifact(&self, task_id: &TaskId) -> StoreResult<Option<String>>;

    /// Retrieve a task row by ID.
    async fn get_task(&self, task_id: &TaskId) -> StoreResult<Option<TaskRow>>;

    /// List stored tasks, newest first, up to `limit`.
    async fn list_tasks(&self, limit: usize) -> StoreResult<Vec<TaskRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_is_unique() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_task_row_serde_roundtrip() {
        let row = TaskRow {
            task_id: TaskId::new(),
            description: "Create a login system".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&row).expect("serialize");
        let back: TaskRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(row, back);
    }
}
