//! In-memory fake for the task store (testing only)
//!
//! Provides `MemoryTaskStore`, which satisfies the `TaskStore` contract
//! without any external dependencies, plus write counters used by
//! no-partial-persistence tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreError;
use crate::store_traits::*;

#[derive(Debug, Default)]
struct TaskState {
    row: Option<TaskRow>,
    artifacts: Vec<String>,
    validations: Vec<serde_json::Value>,
    deployments: Vec<serde_json::Value>,
    summaries: Vec<serde_json::Value>,
}

/// In-memory task store backed by a `HashMap<TaskId, TaskState>`.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<HashMap<String, TaskState>>,
    /// Total writes across all tasks (creates included).
    write_count: AtomicUsize,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes performed against this store.
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    fn with_task<T>(
        &self,
        task_id: &TaskId,
        f: impl FnOnce(&mut TaskState) -> T,
    ) -> StoreResult<T> {
        let mut tasks = self.tasks.lock().unwrap();
        let state = tasks
            .get_mut(&task_id.0)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.0.clone()))?;
        Ok(f(state))
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create_task(&self, description: &str) -> StoreResult<TaskId> {
        let task_id = TaskId::new();
        let row = TaskRow {
            task_id: task_id.clone(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        let mut tasks = self.tasks.lock().unwrap();
        tasks.insert(
            task_id.0.clone(),
            TaskState {
                row: Some(row),
                ..Default::default()
            },
        );
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(task_id)
    }

    async fn record_artifact(&self, task_id: &TaskId, artifact: &str) -> StoreResult<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.with_task(task_id, |s| s.artifacts.push(artifact.to_string()))
    }

    async fn record_validation(
        &self,
        task_id: &TaskId,
        report: serde_json::Value,
    ) -> StoreResult<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.with_task(task_id, |s| s.validations.push(report))
    }

    async fn record_deployment(
        &self,
        task_id: &TaskId,
        status: serde_json::Value,
    ) -> StoreResult<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.with_task(task_id, |s| s.deployments.push(status))
    }

    async fn record_summary(
        &self,
        task_id: &TaskId,
        summary: serde_json::Value,
    ) -> StoreResult<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.with_task(task_id, |s| s.summaries.push(summary))
    }

    async fn fetch_summary(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .get(&task_id.0)
            .and_then(|s| s.summaries.last().cloned()))
    }

    async fn fetch_artifact(&self, task_id: &TaskId) -> StoreResult<Option<String>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .get(&task_id.0)
            .and_then(|s| s.artifacts.last().cloned()))
    }

    async fn fetch_validation(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .get(&task_id.0)
            .and_then(|s| s.validations.last().cloned()))
    }

    async fn fetch_deployment(&self, task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .get(&task_id.0)
            .and_then(|s| s.deployments.last().cloned()))
    }

    async fn get_task(&self, task_id: &TaskId) -> StoreResult<Option<TaskRow>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.get(&task_id.0).and_then(|s| s.row.clone()))
    }

    async fn list_tasks(&self, limit: usize) -> StoreResult<Vec<TaskRow>> {
        let tasks = self.tasks.lock().unwrap();
        let mut rows: Vec<TaskRow> = tasks.values().filter_map(|s| s.row.clone()).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// A store whose writes always fail. Used to exercise persistence-fault
/// handling in the driver.
#[derive(Debug, Default)]
pub struct FailingTaskStore;

#[async_trait]
impl TaskStore for FailingTaskStore {
    async fn create_task(&self, _description: &str) -> StoreResult<TaskId> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn record_artifact(&self, _task_id: &TaskId, _artifact: &str) -> StoreResult<()> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn record_validation(
        &self,
        _task_id: &TaskId,
        _report: serde_json::Value,
    ) -> StoreResult<()> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn record_deployment(
        &self,
        _task_id: &TaskId,
        _status: serde_json::Value,
    ) -> StoreResult<()> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn record_summary(
        &self,
        _task_id: &TaskId,
        _summary: serde_json::Value,
    ) -> StoreResult<()> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn fetch_summary(&self, _task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn fetch_artifact(&self, _task_id: &TaskId) -> StoreResult<Option<String>> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn fetch_validation(&self, _task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn fetch_deployment(&self, _task_id: &TaskId) -> StoreResult<Option<serde_json::Value>> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn get_task(&self, _task_id: &TaskId) -> StoreResult<Option<TaskRow>> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }

    async fn list_tasks(&self, _limit: usize) -> StoreResult<Vec<TaskRow>> {
        Err(StoreError::Connection("store unavailable".to_string()))
    }
}
