//! Pipeline orchestration: the fixed Generate → Validate → Deploy →
//! Summarize chain.
//!
//! One call to [`Orchestrator::execute`] drives one run through five states
//! (generating, validating, deploying, summarizing, done) with no cycles and
//! no concurrent branches. Each stage's result is a hard data dependency for
//! the next, so the chain is strictly sequential within a run; independent
//! runs share no mutable state and may proceed fully in parallel.
//!
//! Failure policy is fail-fast with no partial commit: a capability fault
//! aborts the run and propagates to the caller, and nothing is handed to the
//! task store (persistence happens downstream, only once a complete
//! [`ExecutionResult`] exists).

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::capability::CapabilitySet;
use crate::domain::{DeploymentOutcome, ExecutionResult, MessageKind, Result, Role};
use crate::observer::{PipelineObserver, Stage, TracingObserver};
use crate::record::ExecutionRecord;

/// Per-run options supplied by the driver.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Optional project label, recorded with the run for grouping.
    pub project: Option<String>,
}

/// Sequences the four role capabilities over one task description.
///
/// Holds no per-run state: every `execute` call constructs its own
/// [`ExecutionRecord`], so a single orchestrator may serve concurrent runs.
pub struct Orchestrator {
    capabilities: CapabilitySet,
    observer: Arc<dyn PipelineObserver>,
}

impl Orchestrator {
    /// Build an orchestrator over the given capability set, observed through
    /// the default `tracing` sink.
    pub fn new(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the lifecycle event sink.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Execute one pipeline run.
    ///
    /// The description is forwarded untouched — an empty or whitespace-only
    /// task is accepted; judging it is the generation capability's concern.
    ///
    /// On success the returned history contains exactly five handoffs:
    /// User→Generator, Generator→Validator, Validator→Deployer,
    /// Deployer→Summarizer, Summarizer→User, in that order, regardless of
    /// stage verdicts. On a capability fault the error propagates and no
    /// result exists.
    #[instrument(skip(self, opts), fields(description_len = description.len()))]
    pub async fn execute(
        &self,
        description: &str,
        opts: RunOptions,
    ) -> Result<ExecutionResult> {
        let run_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        let mut record = ExecutionRecord::new();

        self.observer.run_started(&run_id, description);

        // 1. User -> Generator
        self.append(&run_id, &mut record, Role::User, Role::Generator, json!(description), MessageKind::Data);
        self.observer.stage_entered(&run_id, Stage::Generating);
        let artifact = self.capabilities.generator.generate(description).await?;
        self.observer.stage_completed(&run_id, Stage::Generating, true);

        // 2. Generator -> Validator
        self.append(&run_id, &mut record, Role::Generator, Role::Validator, json!(artifact), MessageKind::Data);
        self.observer.stage_entered(&run_id, Stage::Validating);
        let validation = self.capabilities.validator.validate(&artifact).await?;
        self.observer
            .stage_completed(&run_id, Stage::Validating, validation.valid);

        // 3. Validator -> Deployer, gated on validity. An invalid artifact
        // never reaches the deploy capability; its outcome is synthesized.
        self.append(&run_id, &mut record, Role::Validator, Role::Deployer, json!(validation.report), MessageKind::Data);
        self.observer.stage_entered(&run_id, Stage::Deploying);
        let deployment = if validation.valid {
            let outcome = self.capabilities.deployer.deploy(&artifact).await?;
            self.observer
                .stage_completed(&run_id, Stage::Deploying, outcome.success);
            outcome
        } else {
            self.observer.gate_blocked(&run_id);
            self.observer.stage_completed(&run_id, Stage::Deploying, false);
            DeploymentOutcome::blocked()
        };

        // 4. Deployer -> Summarizer. The summarizer always runs, for every
        // combination of valid/invalid and deployed/blocked.
        self.append(&run_id, &mut record, Role::Deployer, Role::Summarizer, json!(deployment.log), MessageKind::Status);
        self.observer.stage_entered(&run_id, Stage::Summarizing);
        let summary = self
            .capabilities
            .summarizer
            .summarize(description, &artifact, &validation, &deployment)
            .await?;
        self.observer.stage_completed(&run_id, Stage::Summarizing, true);

        // 5. Summarizer -> User
        self.append(&run_id, &mut record, Role::Summarizer, Role::User, json!(summary.summary_report), MessageKind::Data);

        let success = validation.valid && deployment.success;
        let duration_ms = start.elapsed().as_millis() as u64;
        self.observer.run_finished(&run_id, success, duration_ms);

        Ok(ExecutionResult {
            run_id,
            success,
            description: description.to_string(),
            project: opts.project,
            artifact,
            validation,
            deployment,
            summary,
            history: record.into_messages(),
            duration_ms,
        })
    }

    fn append(
        &self,
        run_id: &str,
        record: &mut ExecutionRecord,
        sender: Role,
        receiver: Role,
        content: serde_json::Value,
        kind: MessageKind,
    ) {
        record.append(sender, receiver, content, kind);
        let seq = record.len();
        if let Some(message) = record.messages().last() {
            self.observer.handoff_recorded(run_id, seq, message);
        }
    }
}
