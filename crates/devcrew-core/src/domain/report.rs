//! Stage outcome records: validation, deployment, summary, and the final
//! aggregate returned to the caller.

use serde::{Deserialize, Serialize};

use crate::domain::message::Message;

/// Log text used when the deploy gate blocks a run.
pub const BLOCKED_LOG: &str = "Blocked: Code Validation Failed";

/// Verdict produced by the validation capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    /// Whether the artifact passed syntax/semantic checks.
    pub valid: bool,

    /// Human-readable diagnostic text.
    pub report: String,
}

impl ValidationReport {
    pub fn passed(report: impl Into<String>) -> Self {
        Self {
            valid: true,
            report: report.into(),
        }
    }

    pub fn failed(report: impl Into<String>) -> Self {
        Self {
            valid: false,
            report: report.into(),
        }
    }
}

/// Outcome produced by the deploy capability, or synthesized when the gate
/// blocks deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentOutcome {
    /// Whether build/execution succeeded.
    pub success: bool,

    /// Human-readable log: execution output on success, diagnostics on
    /// failure.
    pub log: String,
}

impl DeploymentOutcome {
    pub fn succeeded(log: impl Into<String>) -> Self {
        Self {
            success: true,
            log: log.into(),
        }
    }

    pub fn failed(log: impl Into<String>) -> Self {
        Self {
            success: false,
            log: log.into(),
        }
    }

    /// The synthesized outcome for a run whose validation failed. The deploy
    /// capability is never invoked in that case.
    pub fn blocked() -> Self {
        Self {
            success: false,
            log: BLOCKED_LOG.to_string(),
        }
    }

    /// Whether this outcome was synthesized by the gate rather than produced
    /// by the deploy capability.
    pub fn is_blocked(&self) -> bool {
        !self.success && self.log == BLOCKED_LOG
    }
}

/// Final report produced by the summarization capability.
///
/// Carries the verdict flags alongside the rendered report so drivers can
/// present either without re-deriving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRecord {
    /// Human-readable report covering all four stages.
    pub summary_report: String,

    /// Validation verdict echoed from upstream.
    pub valid: bool,

    /// Deployment verdict echoed from upstream.
    pub deployed: bool,
}

/// The aggregate produced by one complete pipeline run.
///
/// Built once per run and immutable once returned; this is the unit the
/// task store persists and the driver renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    /// Identifier of this run (not the stored task ID; a run exists even
    /// when persistence is skipped or fails).
    pub run_id: String,

    /// Overall verdict: validity AND deployment success.
    pub success: bool,

    /// The original task description, verbatim.
    pub description: String,

    /// Optional project label supplied by the driver, recorded for grouping.
    pub project: Option<String>,

    /// The generated artifact.
    pub artifact: String,

    /// Validation stage outcome.
    pub validation: ValidationReport,

    /// Deployment stage outcome (possibly gate-synthesized).
    pub deployment: DeploymentOutcome,

    /// Final summary.
    pub summary: SummaryRecord,

    /// The complete ordered message history for this run.
    pub history: Vec<Message>,

    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}
