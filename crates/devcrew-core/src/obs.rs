//! Structured observability hooks for pipeline run lifecycle events.
//!
//! Emission functions for key lifecycle events: run start/finish, stage
//! transitions, handoff appends, gate decisions, persistence warnings.
//! Events are emitted at `info!` level through `tracing`; configure via
//! `RUST_LOG` and [`crate::telemetry::init_tracing`].

use tracing::{info, warn};

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("devcrew.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: pipeline run started.
pub fn emit_run_started(run_id: &str, description_len: usize) {
    info!(event = "run.started", run_id = %run_id, description_len = description_len);
}

/// Emit event: pipeline run finished with verdict and duration.
pub fn emit_run_finished(run_id: &str, success: bool, duration_ms: u64) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        success = success,
        duration_ms = duration_ms,
    );
}

/// Emit event: orchestrator entered a stage.
pub fn emit_stage_entered(run_id: &str, stage: &str) {
    info!(event = "stage.entered", run_id = %run_id, stage = %stage);
}

/// Emit event: orchestrator completed a stage.
pub fn emit_stage_completed(run_id: &str, stage: &str, ok: bool) {
    info!(event = "stage.completed", run_id = %run_id, stage = %stage, ok = ok);
}

/// Emit event: one handoff appended to the execution record.
pub fn emit_handoff(run_id: &str, seq: usize, sender: &str, receiver: &str, content_len: usize) {
    info!(
        event = "run.handoff",
        run_id = %run_id,
        seq = seq,
        sender = %sender,
        receiver = %receiver,
        content_len = content_len,
    );
}

/// Emit event: deploy gate blocked the run after failed validation.
pub fn emit_gate_blocked(run_id: &str) {
    info!(event = "gate.blocked", run_id = %run_id);
}

/// Emit event: persistence failed after a successful run (warning level).
pub fn emit_persist_error(run_id: &str, error: &dyn std::fmt::Display) {
    warn!(event = "run.persist_error", run_id = %run_id, error = %error);
}
