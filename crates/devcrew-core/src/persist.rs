//! Persistence adapter: writes a completed run into the task store.
//!
//! The orchestrator never touches the store. Only once a full
//! [`ExecutionResult`] exists does the driver hand it to [`TaskRecorder`],
//! which performs the whole write set: create the task row, then record
//! artifact, validation, deployment, and summary. A faulted run therefore
//! produces zero store writes.

use std::sync::Arc;

use devcrew_store::{StoreResult, TaskId, TaskStore};

use crate::domain::ExecutionResult;

/// Records one `ExecutionResult` into a `TaskStore`.
pub struct TaskRecorder {
    store: Arc<dyn TaskStore>,
}

impl TaskRecorder {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Persist the full artifact set for a completed run.
    ///
    /// Writes are fire-and-forget from the orchestration core's perspective:
    /// a failure here is a persistence fault the driver surfaces as a
    /// warning, not something that invalidates the already-computed result.
    pub async fn persist(&self, result: &ExecutionResult) -> StoreResult<TaskId> {
        let task_id = self.store.create_task(&result.description).await?;
        self.store
            .record_artifact(&task_id, &result.artifact)
            .await?;
        self.store
            .record_validation(&task_id, serde_json::to_value(&result.validation)?)
            .await?;
        self.store
            .record_deployment(&task_id, serde_json::to_value(&result.deployment)?)
            .await?;
        self.store
            .record_summary(&task_id, serde_json::to_value(&result.summary)?)
            .await?;
        Ok(task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcrew_store::MemoryTaskStore;

    use crate::domain::{
        DeploymentOutcome, ExecutionResult, SummaryRecord, ValidationReport,
    };

    fn sample_result() -> ExecutionResult {
        ExecutionResult {
            run_id: "run-1".to_string(),
            success: true,
            description: "Create a login system".to_string(),
            project: None,
            artifact: "def login(): pass".to_string(),
            validation: ValidationReport::passed("Syntax Check: PASSED"),
            deployment: DeploymentOutcome::succeeded("Deployed to Virtual Environment!"),
            summary: SummaryRecord {
                summary_report: "Task complete".to_string(),
                valid: true,
                deployed: true,
            },
            history: vec![],
            duration_ms: 12,
        }
    }

    #[tokio::test]
    async fn test_persist_writes_full_artifact_set() {
        let store = Arc::new(MemoryTaskStore::new());
        let recorder = TaskRecorder::new(store.clone());

        let task_id = recorder.persist(&sample_result()).await.unwrap();

        // create + artifact + validation + deployment + summary
        assert_eq!(store.write_count(), 5);

        let row = store.get_task(&task_id).await.unwrap().expect("row");
        assert_eq!(row.description, "Create a login system");
        let summary = store.fetch_summary(&task_id).await.unwrap().expect("summary");
        assert_eq!(summary["summary_report"], "Task complete");
        let artifact = store.fetch_artifact(&task_id).await.unwrap().expect("artifact");
        assert_eq!(artifact, "def login(): pass");
    }

    #[tokio::test]
    async fn test_persist_surfaces_store_errors() {
        let store = Arc::new(devcrew_store::FailingTaskStore);
        let recorder = TaskRecorder::new(store);
        assert!(recorder.persist(&sample_result()).await.is_err());
    }
}
