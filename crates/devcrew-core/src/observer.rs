//! Injected run observer.
//!
//! The orchestrator reports lifecycle events to an injected sink instead of
//! relying on process-global logging state. The default sink forwards to the
//! structured `tracing` emitters in [`crate::obs`]; tests inject recording
//! observers, embedders can fan events out to UIs or metrics.

use crate::domain::Message;

/// The four capability stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generating,
    Validating,
    Deploying,
    Summarizing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Generating => "generating",
            Stage::Validating => "validating",
            Stage::Deploying => "deploying",
            Stage::Summarizing => "summarizing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sink for pipeline lifecycle events.
///
/// All methods have no-op defaults so implementors subscribe only to what
/// they need. Callbacks are synchronous and must be cheap; heavy consumers
/// should hand off to their own channel.
pub trait PipelineObserver: Send + Sync {
    fn run_started(&self, _run_id: &str, _description: &str) {}

    fn stage_entered(&self, _run_id: &str, _stage: Stage) {}

    fn stage_completed(&self, _run_id: &str, _stage: Stage, _ok: bool) {}

    /// Called after each handoff is appended to the execution record.
    fn handoff_recorded(&self, _run_id: &str, _seq: usize, _message: &Message) {}

    /// Called when the deploy gate blocks a run after failed validation.
    fn gate_blocked(&self, _run_id: &str) {}

    fn run_finished(&self, _run_id: &str, _success: bool, _duration_ms: u64) {}
}

/// Observer that forwards every event to the `tracing`-based emitters.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn run_started(&self, run_id: &str, description: &str) {
        crate::obs::emit_run_started(run_id, description.len());
    }

    fn stage_entered(&self, run_id: &str, stage: Stage) {
        crate::obs::emit_stage_entered(run_id, stage.as_str());
    }

    fn stage_completed(&self, run_id: &str, stage: Stage, ok: bool) {
        crate::obs::emit_stage_completed(run_id, stage.as_str(), ok);
    }

    fn handoff_recorded(&self, run_id: &str, seq: usize, message: &Message) {
        let content_len = message
            .content_text()
            .map(str::len)
            .unwrap_or_else(|| message.content.to_string().len());
        crate::obs::emit_handoff(
            run_id,
            seq,
            &message.sender.to_string(),
            &message.receiver.to_string(),
            content_len,
        );
    }

    fn gate_blocked(&self, run_id: &str) {
        crate::obs::emit_gate_blocked(run_id);
    }

    fn run_finished(&self, run_id: &str, success: bool, duration_ms: u64) {
        crate::obs::emit_run_finished(run_id, success, duration_ms);
    }
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}
