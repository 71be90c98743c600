//! Role capability contracts.
//!
//! The orchestrator composes exactly four capabilities — generate, validate,
//! deploy, summarize — each an opaque, independently replaceable transform.
//! A capability returning `Err` is a fault that aborts the whole run;
//! *expected* failures (an invalid artifact, a failed deployment) must be
//! returned as data inside the contracted result type instead.
//!
//! Contract obligations, per capability:
//!
//! - **Generate**: total over any text input, including the empty string.
//!   Returns a best-effort artifact or an explanatory placeholder; must not
//!   fault on malformed input.
//! - **Validate**: classifies malformed artifacts as invalid with a
//!   diagnostic naming the defect location when determinable. Empty input
//!   yields `valid = false` with an explanatory report, not a fault.
//! - **Deploy**: never invoked when upstream validity is false. Captures both
//!   execution output and failure diagnostics in the log. Must release any
//!   transient resources (temp files, processes) on every exit path.
//! - **Summarize**: total over all four inputs including the synthesized
//!   blocked status; must always produce a coherent report.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DeploymentOutcome, Result, SummaryRecord, ValidationReport};

/// Produces an artifact from a task description.
#[async_trait]
pub trait GenerateCapability: Send + Sync {
    async fn generate(&self, description: &str) -> Result<String>;
}

/// Classifies an artifact as valid or invalid with a diagnostic report.
#[async_trait]
pub trait ValidateCapability: Send + Sync {
    async fn validate(&self, artifact: &str) -> Result<ValidationReport>;
}

/// Builds/deploys a validated artifact, capturing the outcome in a log.
#[async_trait]
pub trait DeployCapability: Send + Sync {
    async fn deploy(&self, artifact: &str) -> Result<DeploymentOutcome>;
}

/// Renders a final report over all upstream stage outputs.
#[async_trait]
pub trait SummarizeCapability: Send + Sync {
    async fn summarize(
        &self,
        description: &str,
        artifact: &str,
        validation: &ValidationReport,
        deployment: &DeploymentOutcome,
    ) -> Result<SummaryRecord>;
}

/// The four typed capability slots the orchestrator is polymorphic over.
///
/// Fixed slots rather than a runtime-keyed map: there is no "unknown role"
/// failure mode, and swapping a backend never touches orchestrator logic.
#[derive(Clone)]
pub struct CapabilitySet {
    pub generator: Arc<dyn GenerateCapability>,
    pub validator: Arc<dyn ValidateCapability>,
    pub deployer: Arc<dyn DeployCapability>,
    pub summarizer: Arc<dyn SummarizeCapability>,
}

impl CapabilitySet {
    pub fn new(
        generator: Arc<dyn GenerateCapability>,
        validator: Arc<dyn ValidateCapability>,
        deployer: Arc<dyn DeployCapability>,
        summarizer: Arc<dyn SummarizeCapability>,
    ) -> Self {
        Self {
            generator,
            validator,
            deployer,
            summarizer,
        }
    }
}
