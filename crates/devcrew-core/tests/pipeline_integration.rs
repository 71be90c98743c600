//! Integration tests for the pipeline with MemoryTaskStore.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use devcrew_core::{
    CapabilitySet, CrewError, DeployCapability, DeploymentOutcome, GenerateCapability,
    Message, Orchestrator, PipelineObserver, Result, Role, RunOptions, Stage,
    SummarizeCapability, SummaryRecord, TaskRecorder, ValidateCapability, ValidationReport,
};
use devcrew_store::{MemoryTaskStore, TaskStore};

struct EchoGenerator;

#[async_trait]
impl GenerateCapability for EchoGenerator {
    async fn generate(&self, description: &str) -> Result<String> {
        Ok(format!("# task: {description}\ndef run(): pass"))
    }
}

struct PassingValidator;

#[async_trait]
impl ValidateCapability for PassingValidator {
    async fn validate(&self, _artifact: &str) -> Result<ValidationReport> {
        Ok(ValidationReport::passed("Syntax Check: PASSED"))
    }
}

struct FaultyGenerator;

#[async_trait]
impl GenerateCapability for FaultyGenerator {
    async fn generate(&self, _description: &str) -> Result<String> {
        Err(CrewError::capability(Role::Generator, "backend unreachable"))
    }
}

struct CountingDeployer(AtomicUsize);

#[async_trait]
impl DeployCapability for CountingDeployer {
    async fn deploy(&self, _artifact: &str) -> Result<DeploymentOutcome> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(DeploymentOutcome::succeeded("Deployed to Virtual Environment!"))
    }
}

struct PlainSummarizer;

#[async_trait]
impl SummarizeCapability for PlainSummarizer {
    async fn summarize(
        &self,
        description: &str,
        _artifact: &str,
        validation: &ValidationReport,
        deployment: &DeploymentOutcome,
    ) -> Result<SummaryRecord> {
        Ok(SummaryRecord {
            summary_report: format!("{description}: {}", deployment.log),
            valid: validation.valid,
            deployed: deployment.success,
        })
    }
}

fn happy_capabilities() -> CapabilitySet {
    CapabilitySet::new(
        Arc::new(EchoGenerator),
        Arc::new(PassingValidator),
        Arc::new(CountingDeployer(AtomicUsize::new(0))),
        Arc::new(PlainSummarizer),
    )
}

/// Observer that records stage transitions and handoffs for assertions.
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl PipelineObserver for RecordingObserver {
    fn run_started(&self, _run_id: &str, _description: &str) {
        self.events.lock().unwrap().push("run_started".to_string());
    }

    fn stage_entered(&self, _run_id: &str, stage: Stage) {
        self.events.lock().unwrap().push(format!("enter:{stage}"));
    }

    fn handoff_recorded(&self, _run_id: &str, seq: usize, message: &Message) {
        self.events
            .lock()
            .unwrap()
            .push(format!("handoff:{seq}:{}->{}", message.sender, message.receiver));
    }

    fn run_finished(&self, _run_id: &str, success: bool, _duration_ms: u64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("run_finished:{success}"));
    }
}

/// Test: a successful run persisted end-to-end through the TaskRecorder.
#[tokio::test]
async fn test_run_then_persist_roundtrip() {
    let orchestrator = Orchestrator::new(happy_capabilities());
    let store = Arc::new(MemoryTaskStore::new());
    let recorder = TaskRecorder::new(store.clone());

    let result = orchestrator
        .execute("Create a login system", RunOptions::default())
        .await
        .expect("run failed");

    assert!(result.success);
    assert_eq!(result.history.len(), 5);

    let task_id = recorder.persist(&result).await.expect("persist failed");
    let summary = store
        .fetch_summary(&task_id)
        .await
        .unwrap()
        .expect("summary stored");
    assert_eq!(summary["valid"], true);
    assert_eq!(summary["deployed"], true);
}

/// Test: a capability fault leaves the store untouched — no partial commit.
#[tokio::test]
async fn test_faulted_run_writes_nothing() {
    let caps = CapabilitySet::new(
        Arc::new(FaultyGenerator),
        Arc::new(PassingValidator),
        Arc::new(CountingDeployer(AtomicUsize::new(0))),
        Arc::new(PlainSummarizer),
    );
    let orchestrator = Orchestrator::new(caps);
    let store = Arc::new(MemoryTaskStore::new());
    let recorder = TaskRecorder::new(store.clone());

    let outcome = orchestrator
        .execute("Create a login system", RunOptions::default())
        .await;
    assert!(outcome.is_err(), "fault must propagate");

    // The driver only persists a complete result; a faulted run never
    // reaches the recorder.
    if let Ok(result) = outcome {
        recorder.persist(&result).await.unwrap();
    }
    assert_eq!(store.write_count(), 0);
}

/// Test: observer sees stages in pipeline order and all five handoffs.
#[tokio::test]
async fn test_observer_sees_ordered_lifecycle() {
    let observer = Arc::new(RecordingObserver::default());
    let orchestrator =
        Orchestrator::new(happy_capabilities()).with_observer(observer.clone());

    orchestrator
        .execute("task", RunOptions::default())
        .await
        .unwrap();

    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "run_started",
            "handoff:1:user->generator",
            "enter:generating",
            "handoff:2:generator->validator",
            "enter:validating",
            "handoff:3:validator->deployer",
            "enter:deploying",
            "handoff:4:deployer->summarizer",
            "enter:summarizing",
            "handoff:5:summarizer->user",
            "run_finished:true",
        ]
    );
}

/// Test: concurrent runs are independent — each gets its own record.
#[tokio::test]
async fn test_concurrent_runs_do_not_interleave_histories() {
    let orchestrator = Arc::new(Orchestrator::new(happy_capabilities()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let orch = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orch.execute(&format!("task {i}"), RunOptions::default())
                .await
                .unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap();
        assert_eq!(result.history.len(), 5);
        assert_eq!(
            result.history[0].content_text(),
            Some(format!("task {i}").as_str())
        );
    }
}
